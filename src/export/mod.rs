mod pipeline;

pub use pipeline::ExportPipeline;

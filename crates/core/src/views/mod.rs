pub mod treemap;

pub use treemap::TreemapViewBuilder;

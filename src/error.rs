use thiserror::Error;

/// Rejected engine configuration. Raised at construction time only.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tile size must be positive and even in both axes, got {width}x{height}")]
    InvalidTileSize { width: u32, height: u32 },
    #[error("proximity cell size must be positive and even, got {0}")]
    InvalidCellSize(u32),
    #[error("trace radius must be positive, got {0}")]
    InvalidTraceRadius(i32),
    #[error("viewport must not be empty, got {width}x{height}")]
    EmptyViewport { width: u32, height: u32 },
    #[error("grid must not be empty, got {width}x{height}")]
    EmptyGrid { width: i32, height: i32 },
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Rejected map or hit-test data.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("layer '{layer}' has {actual} tiles, expected {expected}")]
    LayerSizeMismatch {
        layer: String,
        expected: usize,
        actual: usize,
    },
    #[error("map must have at least one column and one row, got {columns}x{rows}")]
    EmptyMap { columns: u32, rows: u32 },
    #[error("hit-test mask has {actual} pixels, expected {expected}")]
    MaskSizeMismatch { expected: usize, actual: usize },
    #[error("hit-test table is {actual_w}x{actual_h}, tiles are {tile_w}x{tile_h}")]
    HitTableSizeMismatch {
        actual_w: u32,
        actual_h: u32,
        tile_w: u32,
        tile_h: u32,
    },
    #[error("map tiles are {map_w}x{map_h}, config expects {config_w}x{config_h}")]
    TileSizeMismatch {
        map_w: u32,
        map_h: u32,
        config_w: u32,
        config_h: u32,
    },
    #[error("hit-test reference must contain both even and odd pixels")]
    SingleParity,
    #[error("invalid hit-test reference size {width}x{height}")]
    InvalidHitTableSize { width: u32, height: u32 },
    #[error("failed to parse map: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to decode hit-test image: {0}")]
    Image(#[from] image::ImageError),
}

/// Anything that can stop a [`SpatialEngine`](crate::engine::SpatialEngine)
/// from being built.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Map(#[from] MapError),
}

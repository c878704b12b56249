pub mod ensure_json;
pub mod force_json;

pub use ensure_json::ensure_json_middleware;
pub use force_json::force_json_middleware;

pub mod subscription;
pub mod user_id;
pub mod validated_json;

pub use subscription::Entitled;
pub use user_id::UserId;
pub use validated_json::ValidatedJson;

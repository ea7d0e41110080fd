/// Domain errors surfaced to the user.
///
/// Fetch failures are not errors at this level; they travel in-band as
/// [`WidgetData::Error`](crate::widget::WidgetData::Error).
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),
}

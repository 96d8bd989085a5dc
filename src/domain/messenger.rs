/// User-facing message channel owned by the host application.
///
/// Exactly one status or error message is emitted per subscription attempt;
/// remote error detail never reaches the end user.
pub trait Messenger: Send + Sync {
    fn add_status(&self, message: &str);

    fn add_error(&self, message: &str);
}

use error_stack::Report;

/// Flattens every entry of a [`figment::Error`] into printable
/// attachments, since a single extraction can fail in several places
/// at once.
pub trait FigmentErrorAttachable {
    #[must_use]
    fn attach_figment_error(self, error: figment::Error) -> Self;
}

impl<C> FigmentErrorAttachable for Report<C> {
    fn attach_figment_error(mut self, error: figment::Error) -> Self {
        for entry in error {
            self = self.attach_printable(entry.to_string());
        }
        self
    }
}

// src/form/mod.rs
//
// Builder form state. Every user action is an `Event`; `FormController::dispatch`
// applies it and reports an `Outcome` that the HTTP layer turns into markup.

pub mod preview;
pub mod products;
pub mod render;
pub mod submit;
pub mod theme;

use crate::models::Theme;

pub use preview::{PreviewField, Previews, Thumbnail};
pub use products::{BlockKey, ProductBlocks};
pub use submit::{SubmitButton, SubmitRejection, SubmitTicket, validate_submission};
pub use theme::ThemePicker;

/// The fields the submit preconditions look at, in document order.
#[derive(Debug, Clone, Default)]
pub struct FormSnapshot {
    pub business_name: String,
    pub product_names: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum Event {
    AddProduct,
    RemoveProduct(BlockKey),
    SelectTheme(Theme),
    /// A file read finished. `None` means nothing usable was selected.
    PreviewLoaded {
        field: PreviewField,
        thumbnail: Option<Thumbnail>,
    },
    Submit(FormSnapshot),
}

#[derive(Debug, Clone)]
pub enum Outcome {
    ProductAdded(BlockKey),
    ProductRemoved(BlockKey),
    ThemeSelected(Theme),
    PreviewShown(PreviewField),
    SubmitAccepted(SubmitTicket),
    SubmitRejected(SubmitRejection),
    Unchanged,
}

#[derive(Debug, Default)]
pub struct FormController {
    products: ProductBlocks,
    theme: ThemePicker,
    previews: Previews,
    submit: SubmitButton,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn products(&self) -> &ProductBlocks {
        &self.products
    }

    pub fn theme(&self) -> &ThemePicker {
        &self.theme
    }

    pub fn previews(&self) -> &Previews {
        &self.previews
    }

    pub fn submit_button(&self) -> &SubmitButton {
        &self.submit
    }

    pub fn dispatch(&mut self, event: Event) -> Outcome {
        match event {
            Event::AddProduct => Outcome::ProductAdded(self.products.add()),
            Event::RemoveProduct(key) => match self.products.remove(key) {
                Some(removed) => {
                    self.previews.forget(PreviewField::Product(removed.key));
                    Outcome::ProductRemoved(removed.key)
                }
                None => Outcome::Unchanged,
            },
            Event::SelectTheme(theme) => {
                self.theme.select(theme);
                Outcome::ThemeSelected(theme)
            }
            Event::PreviewLoaded { field, thumbnail } => {
                if let PreviewField::Product(key) = field {
                    if self.products.get(key).is_none() {
                        return Outcome::Unchanged;
                    }
                }
                match thumbnail {
                    Some(thumbnail) => {
                        self.previews.set(field, thumbnail);
                        Outcome::PreviewShown(field)
                    }
                    None => Outcome::Unchanged,
                }
            }
            Event::Submit(snapshot) => self.submit(snapshot),
        }
    }

    fn submit(&mut self, snapshot: FormSnapshot) -> Outcome {
        let names = snapshot.product_names.iter().map(String::as_str);
        if let Err(rejection) = validate_submission(&snapshot.business_name, names) {
            return Outcome::SubmitRejected(rejection);
        }
        match self.submit.begin() {
            Ok(ticket) => Outcome::SubmitAccepted(ticket),
            Err(rejection) => Outcome::SubmitRejected(rejection),
        }
    }

    /// The submission for `attempt` completed (the browser is navigating away).
    pub fn submit_finished(&mut self, attempt: u64) -> bool {
        self.submit.finish(attempt)
    }

    /// The safety timer for `attempt` fired.
    pub fn submit_timed_out(&mut self, attempt: u64) -> bool {
        self.submit.time_out(attempt)
    }
}

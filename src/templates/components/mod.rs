use maud::{html, Markup};

pub mod apartment;
pub mod card;
pub mod error;
pub mod filters;
pub mod map;

pub use apartment::apartment_card;
pub use card::card;
pub use error::error_page;
pub use filters::filter_form;
pub use map::map_panel;

/// Shown when upstream could not be reached and there is nothing to list.
pub fn fetch_warning() -> Markup {
    html! {
        div class="warning" role="alert" {
            strong { "Failed to fetch data from the listings service." }
            " Results may be missing; try again in a few minutes."
        }
    }
}

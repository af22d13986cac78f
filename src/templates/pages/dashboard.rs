use crate::auth::Authenticated;
use crate::domain::{FilterSpec, FlatRecord};
use crate::templates::components::{apartment_card, card, fetch_warning, filter_form, map_panel};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct SearchResults {
    pub records: Vec<FlatRecord>,
    pub fetch_failed: bool,
    /// Query string that reproduces this search on `/export`.
    pub export_query: String,
}

pub struct DashboardVm<'a> {
    pub auth: &'a Authenticated,
    pub spec: FilterSpec,
    pub show_map: bool,
    /// `None` until the user runs a search.
    pub results: Option<SearchResults>,
}

pub fn dashboard_page(vm: &DashboardVm) -> Markup {
    desktop_layout(
        "Dashboard",
        Some(vm.auth.identity()),
        html! {
            main class="container" {
                h1 { "Find Your Dream Apartment in Charlotte" }
                div class="layout" {
                    aside { (filter_form(&vm.spec, vm.show_map)) }
                    section {
                        @match &vm.results {
                            None => {
                                (card("Start searching", html! {
                                    p { "Set any filters you like and press Search." }
                                }))
                            }
                            Some(results) => {
                                (results_panel(results, vm.show_map))
                            }
                        }
                    }
                }
            }
        },
    )
}

fn results_panel(results: &SearchResults, show_map: bool) -> Markup {
    html! {
        @if results.fetch_failed {
            (fetch_warning())
        }
        @if results.records.is_empty() {
            @if !results.fetch_failed {
                div class="warning" {
                    "No apartments found. Try adjusting your search criteria."
                }
            }
        } @else {
            p {
                strong { (results.records.len()) } " result(s). "
                a href=(format!("/export?{}", results.export_query)) { "Download as spreadsheet" }
            }
            @if show_map {
                (map_panel(&results.records))
            }
            @for record in &results.records {
                (apartment_card(record))
            }
        }
    }
}

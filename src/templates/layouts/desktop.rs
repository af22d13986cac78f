use crate::auth::Identity;
use maud::{html, Markup, PreEscaped, DOCTYPE};

const STYLES: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #333; background: #fafafa; }
header { display: flex; align-items: center; justify-content: space-between; padding: 0.75rem 1.5rem; background: #fff; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
header h3 { margin: 0; color: #0a7e8c; }
header nav { display: flex; gap: 1rem; align-items: center; }
main.container { max-width: 1100px; margin: 1.5rem auto; padding: 0 1rem; }
main.narrow { max-width: 420px; }
.layout { display: grid; grid-template-columns: 280px 1fr; gap: 1.5rem; }
.card, .apartment-card { background: #fff; border-radius: 8px; padding: 1rem 1.25rem; margin-bottom: 1rem; box-shadow: 0 1px 3px rgba(0,0,0,.08); }
.apartment-card h2 { color: #0a7e8c; margin-top: 0; }
.apartment-card img { max-width: 100%; border-radius: 6px; }
.rent-price { font-size: 1.2rem; font-weight: bold; color: #0a7e8c; }
.warning { background: #fff4e5; border: 1px solid #f0a030; padding: 0.75rem 1rem; border-radius: 6px; }
.error { color: #b42318; }
form.filters label { display: block; margin-top: 0.6rem; font-size: 0.9rem; }
form.filters input[type=text], form.filters input[type=number], form.filters input[type=date] { width: 100%; padding: 6px; box-sizing: border-box; }
#map { height: 480px; border-radius: 8px; }
"#;

pub fn desktop_layout(title: &str, user: Option<&Identity>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " | Charlotte Apartment Finder" }
                style { (PreEscaped(STYLES)) }
            }
            body {
                header {
                    h3 { "Charlotte Apartment Finder" }
                    nav {
                        @if let Some(identity) = user {
                            a href="/dashboard" { "Dashboard" }
                            span { (identity.email) " (" (identity.role) ")" }
                            form method="post" action="/logout" style="margin: 0;" {
                                button type="submit" { "Sign out" }
                            }
                        } @else {
                            a href="/login" { "Login" }
                        }
                    }
                }
                (content)
            }
        }
    }
}

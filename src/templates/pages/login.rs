use crate::templates::desktop_layout;
use maud::{html, Markup};

/// Sign-in form. `error` is shown above the form after a failed attempt.
pub fn login_page(email: &str, error: Option<&str>) -> Markup {
    desktop_layout(
        "Sign in",
        None,
        html! {
            main class="container narrow" {
                h1 { "Sign in" }
                @if let Some(message) = error {
                    p class="error" role="alert" { (message) }
                }
                form class="card" method="post" action="/login" {
                    label for="email" { "Email address" }
                    input
                        type="email"
                        id="email"
                        name="email"
                        value=(email)
                        placeholder="you@domain.com"
                        autocomplete="email"
                        required;

                    label for="password" { "Password" }
                    input
                        type="password"
                        id="password"
                        name="password"
                        autocomplete="current-password"
                        required;

                    p { button type="submit" { "Sign in" } }
                }
            }
        },
    )
}

use crate::{Model, Msg};
use gloo_storage::{LocalStorage, Storage};
use yew::html::Scope;
use yew::prelude::*;

const THEME_KEY: &str = "theme";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn load() -> Self {
        LocalStorage::get::<String>(THEME_KEY)
            .map(|stored| Self::from_stored(&stored))
            .unwrap_or(Theme::Light)
    }

    fn from_stored(value: &str) -> Self {
        if value == "dark" { Theme::Dark } else { Theme::Light }
    }

    fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn store(self) {
        if let Err(e) = LocalStorage::set(THEME_KEY, self.as_str()) {
            log::warn!("Theme preference not saved: {}", e);
        }
    }

    pub fn apply(self) {
        let body = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.body());
        if let Some(body) = body {
            if let Err(e) = body
                .class_list()
                .toggle_with_force("dark-mode", self == Theme::Dark)
            {
                log::warn!("Theme class not applied: {:?}", e);
            }
        }
    }
}

pub fn render_theme_toggle(theme: Theme, link: &Scope<Model>) -> Html {
    html! {
        <div class="top-right">
            <button
                id="theme-toggle"
                class="theme-toggle"
                onclick={link.callback(|_| Msg::ToggleTheme)}
                title={ if theme == Theme::Light { "Switch to Dark Mode" } else { "Switch to Light Mode" } }
            >
                { if theme == Theme::Light {
                    html! { <img src="https://cdnjs.cloudflare.com/ajax/libs/twemoji/14.0.2/svg/2600.svg" alt="Sun Icon" class="toggle-icon" /> }
                } else {
                    html! { <img src="https://cdnjs.cloudflare.com/ajax/libs/twemoji/14.0.2/svg/1f319.svg" alt="Moon Icon" class="toggle-icon" /> }
                }}
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_stored_value_means_light() {
        assert_eq!(Theme::from_stored("dark"), Theme::Dark);
        assert_eq!(Theme::from_stored("sepia"), Theme::Light);
        assert_eq!(Theme::Dark.toggled().as_str(), "light");
    }
}

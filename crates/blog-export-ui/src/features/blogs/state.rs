//! Add-blog form state.
//!
//! # Design
//! - The form is hidden until opened and closes again after a successful submit.
//! - Only absolute http(s) URLs are sent; anything else stays in the form with a message.
//! - A failed backend call reopens the form with the typed URL intact.

use url::Url;

/// Add-blog control state.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum AddBlogState {
    /// Only the "Add blog" button is shown.
    #[default]
    Idle,
    /// URL input is shown.
    Editing {
        /// URL as typed.
        url: String,
        /// Validation or submit error.
        error: Option<String>,
    },
    /// Request in flight.
    Submitting {
        /// URL sent to the backend.
        url: String,
    },
}

/// User intent and request outcomes for the add form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddBlogAction {
    /// Show the URL input.
    Open,
    /// URL edited.
    Edit(String),
    /// Hide the form.
    Cancel,
    /// Validate and send the URL.
    Submit,
    /// Backend accepted the blog.
    Saved,
    /// Backend call failed.
    Rejected(String),
}

/// Side effect requested by a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddBlogEffect {
    /// Nothing to do.
    None,
    /// Send this URL to the add endpoint.
    Send(String),
    /// Blog added: refresh the list.
    Refresh,
}

/// Why a URL was not accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UrlProblem {
    /// Nothing was entered.
    Blank,
    /// Not an absolute http(s) URL with a host.
    NotHttp,
}

impl UrlProblem {
    /// Message shown below the input.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Blank => "Enter the blog URL",
            Self::NotHttp => "Blog URL must start with http:// or https://",
        }
    }
}

/// Normalise a typed blog URL.
///
/// # Errors
/// Returns [`UrlProblem`] when the value is blank or not an http(s) URL.
pub fn validate_blog_url(raw: &str) -> Result<String, UrlProblem> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(UrlProblem::Blank);
    }
    let parsed = Url::parse(url).map_err(|_| UrlProblem::NotHttp)?;
    if !matches!(parsed.scheme(), "http" | "https")
        || parsed.host_str().is_none_or(str::is_empty)
    {
        return Err(UrlProblem::NotHttp);
    }
    Ok(url.to_string())
}

impl AddBlogState {
    /// Apply an action, returning the effect the view must perform.
    pub fn apply(&mut self, action: AddBlogAction) -> AddBlogEffect {
        match (std::mem::take(self), action) {
            (Self::Idle, AddBlogAction::Open) => {
                *self = Self::Editing {
                    url: String::new(),
                    error: None,
                };
                AddBlogEffect::None
            }
            (Self::Editing { .. }, AddBlogAction::Edit(url)) => {
                *self = Self::Editing { url, error: None };
                AddBlogEffect::None
            }
            (Self::Editing { .. }, AddBlogAction::Cancel) => AddBlogEffect::None,
            (Self::Editing { url, .. }, AddBlogAction::Submit) => match validate_blog_url(&url) {
                Ok(clean) => {
                    *self = Self::Submitting { url: clean.clone() };
                    AddBlogEffect::Send(clean)
                }
                Err(problem) => {
                    *self = Self::Editing {
                        url,
                        error: Some(problem.message().to_string()),
                    };
                    AddBlogEffect::None
                }
            },
            (Self::Submitting { .. }, AddBlogAction::Saved) => AddBlogEffect::Refresh,
            (Self::Submitting { url }, AddBlogAction::Rejected(detail)) => {
                *self = Self::Editing {
                    url,
                    error: Some(format!("Could not add blog: {detail}")),
                };
                AddBlogEffect::None
            }
            (previous, _) => {
                *self = previous;
                AddBlogEffect::None
            }
        }
    }

    /// Whether a submit is in flight.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting { .. })
    }
}

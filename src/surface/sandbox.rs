use crate::foundation::error::{SlideError, SlideResult};

/// Capabilities granted to the isolated document hosting a slide.
///
/// Generated slide markup is untrusted. It may run scripts and the host may reach into it
/// (same-origin) to apply the fit transform; nothing else is permitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SandboxPolicy {
    /// Allow script execution inside the document.
    pub allow_scripts: bool,
    /// Treat the document as same-origin so the host can restyle it.
    pub allow_same_origin: bool,
    /// Allow the document to navigate the top-level browsing context.
    pub allow_top_navigation: bool,
    /// Allow the document to open new windows.
    pub allow_popups: bool,
    /// Allow form submission (and with it, arbitrary outbound requests).
    pub allow_forms: bool,
}

impl Default for SandboxPolicy {
    fn default() -> Self {
        Self {
            allow_scripts: true,
            allow_same_origin: true,
            allow_top_navigation: false,
            allow_popups: false,
            allow_forms: false,
        }
    }
}

impl SandboxPolicy {
    /// Reject any policy broader than "scripts + same-origin".
    pub fn check(&self) -> SlideResult<()> {
        let mut broad = Vec::new();
        if self.allow_top_navigation {
            broad.push("allow-top-navigation");
        }
        if self.allow_popups {
            broad.push("allow-popups");
        }
        if self.allow_forms {
            broad.push("allow-forms");
        }
        if broad.is_empty() {
            Ok(())
        } else {
            Err(SlideError::validation(format!(
                "sandbox grants more than scripts + same-origin: {}",
                broad.join(", ")
            )))
        }
    }

    /// Space-separated token list in `sandbox` attribute form.
    pub fn to_attribute(&self) -> String {
        let mut tokens = Vec::new();
        if self.allow_scripts {
            tokens.push("allow-scripts");
        }
        if self.allow_same_origin {
            tokens.push("allow-same-origin");
        }
        if self.allow_top_navigation {
            tokens.push("allow-top-navigation");
        }
        if self.allow_popups {
            tokens.push("allow-popups");
        }
        if self.allow_forms {
            tokens.push("allow-forms");
        }
        tokens.join(" ")
    }
}

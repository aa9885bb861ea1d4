use std::fmt;
use std::path::Path;

/// The browser family backing a session
///
/// The two families differ in launch flags, default WebDriver endpoint and
/// in how they report elements that cannot be scrolled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum BrowserFamily {
    /// Chrome/Chromium via chromedriver
    Chrome,
    /// Firefox via geckodriver
    Firefox,
}

/// What to do when an element reports a move-target-out-of-bounds error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutOfBoundsRecovery {
    /// Wait the retry backoff, then try again
    Backoff,
    /// Scroll the window a little, then try again immediately
    Nudge,
}

impl BrowserFamily {
    /// WebDriver endpoint the stock driver binary listens on
    pub fn default_webdriver_url(&self) -> &'static str {
        match self {
            Self::Chrome => "http://localhost:9515",
            Self::Firefox => "http://localhost:4444",
        }
    }

    /// How this family recovers from out-of-bounds scroll targets
    ///
    /// Firefox raises the error for elements just outside the viewport, and a
    /// small window scroll clears it.
    pub fn out_of_bounds_recovery(&self) -> OutOfBoundsRecovery {
        match self {
            Self::Chrome => OutOfBoundsRecovery::Backoff,
            Self::Firefox => OutOfBoundsRecovery::Nudge,
        }
    }

    /// Builds the command-line arguments passed to the browser binary
    ///
    /// # Arguments
    ///
    /// * `headless` - Run without a window
    /// * `size` - Window width and height in pixels
    /// * `profile_dir` - Optional profile directory to reuse
    /// * `profile_name` - Chrome profile name inside `profile_dir` (default `Default`)
    pub fn launch_args(
        &self,
        headless: bool,
        size: (u32, u32),
        profile_dir: Option<&Path>,
        profile_name: Option<&str>,
    ) -> Vec<String> {
        let (width, height) = size;
        let mut args = vec![format!("--window-size={},{}", width, height)];

        match self {
            Self::Chrome => {
                args.push("--disable-gpu".to_string());
                if headless {
                    args.push("--headless=new".to_string());
                }
                if let Some(dir) = profile_dir {
                    args.push(format!("--user-data-dir={}", dir.display()));
                    args.push(format!(
                        "--profile-directory={}",
                        profile_name.unwrap_or("Default")
                    ));
                }
            }
            Self::Firefox => {
                if headless {
                    args.push("-headless".to_string());
                }
                if let Some(dir) = profile_dir {
                    args.push("-profile".to_string());
                    args.push(dir.display().to_string());
                }
            }
        }

        args
    }
}

impl fmt::Display for BrowserFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chrome => write!(f, "chrome"),
            Self::Firefox => write!(f, "firefox"),
        }
    }
}

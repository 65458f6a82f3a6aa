use crate::{browser::config::{ConnectionOptions, LaunchOptions},
            callbacks::Activator,
            dom::{DomTree, ElementHandle},
            error::{NavError, Result}};
use headless_chrome::{Browser, Tab};
use std::{ffi::OsStr, sync::Arc, time::Duration};

/// Browser session that manages a Chrome/Chromium instance
pub struct BrowserSession {
    /// The underlying headless_chrome Browser instance
    browser: Browser,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));

        // Keep the browser alive while the shell waits for user activations
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));

        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }

        if let Some(dir) = options.user_data_dir {
            launch_opts.user_data_dir = Some(dir);
        }

        launch_opts.sandbox = options.sandbox;

        let browser = Browser::new(launch_opts).map_err(|e| NavError::LaunchFailed(e.to_string()))?;

        browser.new_tab().map_err(|e| NavError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self { browser })
    }

    /// Connect to an existing browser instance via WebSocket
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let browser = Browser::connect(options.ws_url).map_err(|e| NavError::ConnectionFailed(e.to_string()))?;

        Ok(Self { browser })
    }

    /// The first open tab
    pub fn tab(&self) -> Result<Arc<Tab>> {
        let tabs = self
            .browser
            .get_tabs()
            .lock()
            .map_err(|e| NavError::ConnectionFailed(format!("Failed to get tabs: {}", e)))?;

        tabs.first()
            .cloned()
            .ok_or_else(|| NavError::ConnectionFailed("No open tab".to_string()))
    }

    /// Navigate the tab and wait for the load to finish
    pub fn navigate(&self, url: &str) -> Result<()> {
        let tab = self.tab()?;
        tab.navigate_to(url)
            .map_err(|e| NavError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;
        tab.wait_until_navigated()
            .map_err(|e| NavError::NavigationFailed(format!("Navigation timeout: {}", e)))?;

        Ok(())
    }

    /// Snapshot the page currently loaded in the tab
    pub fn extract_page(&self) -> Result<DomTree> {
        DomTree::from_tab(&self.tab()?)
    }

    /// Hide the given elements in the live page
    pub fn suppress(&self, elements: &[ElementHandle]) -> Result<()> {
        let tab = self.tab()?;
        for handle in elements {
            let selector = serde_json::to_string(&handle.css_selector)?;
            let js = format!(
                "(function() {{ var el = document.querySelector({}); if (el) {{ el.style.display = 'none'; }} return !!el; }})()",
                selector
            );

            let result = tab
                .evaluate(&js, false)
                .map_err(|e| NavError::ElementNotFound(format!("Failed to hide {}: {}", handle.css_selector, e)))?;

            if result.value.and_then(|v| v.as_bool()) != Some(true) {
                log::warn!("Could not hide {}: not found in page", handle.css_selector);
            }
        }
        Ok(())
    }
}

impl Activator for BrowserSession {
    fn activate(&mut self, target: &ElementHandle) -> Result<()> {
        let tab = self.tab()?;
        let element = tab
            .find_element(&target.css_selector)
            .map_err(|e| NavError::StaleElement(format!("{}: {}", target.css_selector, e)))?;

        element
            .click()
            .map_err(|e| NavError::StaleElement(format!("Failed to click {}: {}", target.css_selector, e)))?;

        Ok(())
    }
}

use crate::config::HarnessConfig;
use crate::error::Result;
use crate::registry::ManagedSession;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use thirtyfour::{ChromiumLikeCapabilities, DesiredCapabilities, TimeoutConfiguration, WebDriver};

/// Chrome command-line switches for a harness-driven browser.
pub fn chrome_args(config: &HarnessConfig) -> Vec<String> {
    let mut args = vec![
        format!("--window-size={},{}", config.window_width, config.window_height),
        "--no-sandbox".to_string(),
        "--disable-gpu".to_string(),
        "--disable-dev-shm-usage".to_string(),
    ];
    if config.headless {
        args.push("--headless=new".to_string());
    }
    args
}

/// Chrome profile preferences: silence the password manager and point
/// downloads at the configured directory.
pub fn chrome_prefs(config: &HarnessConfig) -> Value {
    let mut prefs = json!({
        "credentials_enable_service": false,
        "profile.password_manager_enabled": false,
    });
    if let Some(dir) = &config.download_dir {
        prefs["download.default_directory"] = json!(dir.display().to_string());
    }
    prefs
}

fn build_capabilities(config: &HarnessConfig) -> Result<thirtyfour::ChromeCapabilities> {
    let mut caps = DesiredCapabilities::chrome();
    for arg in chrome_args(config) {
        caps.add_arg(&arg)?;
    }
    // Drops the "Chrome is being controlled by automated test software"
    // infobar, which would otherwise sit inside every recording.
    caps.add_experimental_option("excludeSwitches", json!(["enable-automation"]))?;
    caps.add_experimental_option("prefs", chrome_prefs(config))?;
    Ok(caps)
}

/// One connected browser, identified by the name it was registered under.
pub struct Session {
    name: String,
    driver: WebDriver,
}

impl Session {
    /// Open a browser through the configured WebDriver endpoint and
    /// apply the harness timeouts.
    pub async fn connect(name: &str, config: &HarnessConfig) -> Result<Self> {
        let caps = build_capabilities(config)?;
        let driver = WebDriver::new(&config.webdriver_url, caps).await?;
        driver
            .update_timeouts(TimeoutConfiguration::new(
                None,
                Some(Duration::from_secs(config.page_load_timeout_secs)),
                Some(Duration::from_secs(config.implicit_wait_secs)),
            ))
            .await?;
        driver.delete_all_cookies().await?;
        driver.maximize_window().await?;
        tracing::info!(name, url = %config.webdriver_url, "browser session connected");
        Ok(Self {
            name: name.to_string(),
            driver,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying driver, for element lookups and script execution.
    pub fn driver(&self) -> &WebDriver {
        &self.driver
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        self.driver.goto(url).await?;
        Ok(())
    }

    /// Bring this session's window to the front.
    pub async fn focus(&self) -> Result<()> {
        self.driver.maximize_window().await?;
        Ok(())
    }

    /// Push this session's window out of the way so another session's
    /// window is the one on screen.
    pub async fn unfocus(&self) -> Result<()> {
        self.driver.minimize_window().await?;
        Ok(())
    }

    /// End the browser session. The driver is consumed; the window closes.
    pub async fn quit(self) -> Result<()> {
        self.driver.quit().await?;
        Ok(())
    }
}

#[async_trait]
impl ManagedSession for Session {
    async fn focus(&self) -> Result<()> {
        Session::focus(self).await
    }

    async fn unfocus(&self) -> Result<()> {
        Session::unfocus(self).await
    }

    async fn close(self) -> Result<()> {
        self.quit().await
    }
}

use std::time::Duration;

use anyhow::Result;
use chromiumoxide::{
    browser::{Browser, BrowserConfig},
    cdp::browser_protocol::page::{
        EventLifecycleEvent, PrintToPdfParamsBuilder, SetLifecycleEventsEnabledParams,
    },
    page::Page,
};
use futures::{Stream, StreamExt};

use crate::error::RenderError;

// A4 in inches, the unit Page.printToPDF expects.
const A4_WIDTH_IN: f64 = 8.27;
const A4_HEIGHT_IN: f64 = 11.69;

/// The lifecycle event Chromium emits once no network requests have been in
/// flight for its quiescence window.
const NETWORK_IDLE_EVENT: &str = "networkIdle";

/// A shared headless Chromium instance. Each PDF capture gets its own
/// short-lived page; the browser itself lives for the whole process.
pub struct BrowserPool {
    browser: Browser,
    idle_timeout: Duration,
}

impl BrowserPool {
    pub async fn new(idle_timeout: Duration) -> Result<Self> {
        let config = BrowserConfig::builder()
            .viewport(None) // Set viewport to None for headless mode
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config).await?;

        // Spawn handler properly - this is crucial for chromiumoxide to work
        // Don't break on errors as some WebSocket deserialization errors are normal
        tokio::task::spawn(async move {
            while let Some(_) = handler.next().await {
                // Continue processing regardless of errors
                // WebSocket deserialization errors are common and shouldn't stop the handler
            }
        });

        Ok(BrowserPool {
            browser,
            idle_timeout,
        })
    }

    /// Loads an HTML document into a fresh page, waits for it to quiesce and
    /// captures it as an A4 PDF with backgrounds. The page is closed whether
    /// or not the capture succeeds.
    pub async fn print_to_pdf(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let page = self.browser.new_page("about:blank").await?;
        let result = self.capture(&page, html).await;
        let _ = page.close().await;
        result
    }

    async fn capture(&self, page: &Page, html: &str) -> Result<Vec<u8>, RenderError> {
        page.execute(SetLifecycleEventsEnabledParams::new(true))
            .await?;
        let events = page.event_listener::<EventLifecycleEvent>().await?;

        page.set_content(html).await?;

        // Remote images referenced by the template are still loading after
        // set_content returns; capture only once the network has settled.
        wait_for_network_idle(
            events.map(|event| event.name.clone()),
            self.idle_timeout,
        )
        .await?;

        let params = PrintToPdfParamsBuilder::default()
            .paper_width(A4_WIDTH_IN)
            .paper_height(A4_HEIGHT_IN)
            .print_background(true)
            .build();

        Ok(page.pdf(params).await?)
    }
}

/// Waits for the page's network-idle signal, bounded so a stalled resource
/// load fails the render instead of hanging it.
async fn wait_for_network_idle(
    events: impl Stream<Item = String>,
    window: Duration,
) -> Result<(), RenderError> {
    let saw_idle = async {
        futures::pin_mut!(events);
        while let Some(name) = events.next().await {
            if name == NETWORK_IDLE_EVENT {
                return true;
            }
        }
        false
    };

    match tokio::time::timeout(window, saw_idle).await {
        Ok(true) => Ok(()),
        // A closed event stream means the page went away before quiescing.
        Ok(false) | Err(_) => Err(RenderError::Timeout(window)),
    }
}

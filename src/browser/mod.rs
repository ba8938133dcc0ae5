use std::io;

/// Something that can show a URL to the user in a browser.
pub trait BrowserLauncher {
    fn open(&self, url: &str) -> io::Result<()>;
}

/// Opens URLs in the user's default browser
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &str) -> io::Result<()> {
        log::debug!("Launching browser for {}", url);
        webbrowser::open(url)
    }
}

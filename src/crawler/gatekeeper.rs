//! Pre-fetch decision for candidate URLs

use crate::url::ExtensionFilter;
use url::Url;

/// Decides whether the engine should fetch a candidate URL
///
/// Already-visited URLs are always refused. Everything else is fetched unless
/// its path extension is blacklisted. Robots rules, content sniffing and rate
/// classes are deliberately not consulted.
#[derive(Debug, Clone)]
pub struct PageGatekeeper {
    filter: ExtensionFilter,
}

impl PageGatekeeper {
    pub fn new(filter: ExtensionFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> &ExtensionFilter {
        &self.filter
    }

    /// Returns true if `url` should be fetched
    pub fn should_fetch(&self, url: &Url, already_visited: bool) -> bool {
        if already_visited {
            return false;
        }

        if self.filter.is_rejected(url) {
            tracing::info!("Discarding {}", url);
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    fn gatekeeper() -> PageGatekeeper {
        PageGatekeeper::new(ExtensionFilter::new([".png", ".pdf"]))
    }

    #[test]
    fn test_visited_never_fetched() {
        let gatekeeper = gatekeeper();
        for url in ["https://a.com/", "https://a.com/logo.png", "https://a.com/guide"] {
            assert!(!gatekeeper.should_fetch(&Url::parse(url).unwrap(), true));
        }
    }

    #[test]
    fn test_unvisited_follows_filter() {
        let gatekeeper = gatekeeper();
        for url in [
            "https://a.com/",
            "https://a.com/logo.png",
            "https://a.com/manual.pdf",
            "https://a.com/guide.html",
        ] {
            let url = Url::parse(url).unwrap();
            assert_eq!(
                gatekeeper.should_fetch(&url, false),
                !gatekeeper.filter().is_rejected(&url),
                "{}",
                url
            );
        }
    }

    /// Collects formatted log output in memory
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let result = tracing::subscriber::with_default(subscriber, f);
        (result, buffer.contents())
    }

    #[test]
    fn test_png_rejected() {
        let gatekeeper = PageGatekeeper::new(ExtensionFilter::new([".png"]));

        let (fetch, logs) = with_captured_logs(|| {
            gatekeeper.should_fetch(&Url::parse("https://a.com/x.png").unwrap(), false)
        });
        assert!(!fetch);
        assert!(logs.contains("Discarding https://a.com/x.png"), "{}", logs);

        let (fetch, logs) = with_captured_logs(|| {
            gatekeeper.should_fetch(&Url::parse("https://a.com/x").unwrap(), false)
        });
        assert!(fetch);
        assert!(!logs.contains("Discarding"), "{}", logs);
    }

    #[test]
    fn test_visited_refusal_not_logged() {
        let gatekeeper = PageGatekeeper::new(ExtensionFilter::new([".png"]));
        let (fetch, logs) = with_captured_logs(|| {
            gatekeeper.should_fetch(&Url::parse("https://a.com/x.png").unwrap(), true)
        });
        assert!(!fetch);
        assert!(logs.is_empty(), "{}", logs);
    }
}

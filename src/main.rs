//!
//! quick-open-demo: a floating file finder over a directory tree.
//!
//! Opens the palette over the directory given as the first argument (or the
//! current directory). Typing filters files by substring; Enter or a double
//! click prints the chosen path to stdout and quits. Escape quits without
//! printing.
//!
//! Logs go to stderr. Set `RUST_LOG` to override the default filter.

mod finder;

use std::path::PathBuf;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[cfg(not(target_os = "macos"))]
use crate::finder::FileIndex;

const DEFAULT_FILTER: &str = "quick_open=debug,quick_open_demo=info";

fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Directory to index: first argument, else the working directory.
fn search_root() -> PathBuf {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Stores `value` in `cell` unless it is already filled.
///
/// A second value is dropped with a warning; returns whether `value` was kept.
#[cfg(any(target_os = "macos", test))]
fn install_once<T>(cell: &std::cell::OnceCell<T>, value: T) -> bool {
    if cell.set(value).is_err() {
        tracing::warn!("already initialized, dropping the new instance");
        return false;
    }
    true
}

#[cfg(target_os = "macos")]
mod app {
    use std::cell::OnceCell;
    use std::path::PathBuf;

    use objc2::rc::Retained;
    use objc2::runtime::ProtocolObject;
    use objc2::{define_class, msg_send, DefinedClass, MainThreadOnly};
    use objc2_app_kit::{
        NSApplication, NSApplicationActivationPolicy, NSApplicationDelegate, NSTextField, NSView,
    };
    use objc2_foundation::{MainThreadMarker, NSNotification, NSObject, NSObjectProtocol, NSString};
    use quick_open::macos::QuickOpenPalette;
    use quick_open::{PaletteOptions, QuickOpenDelegate};

    use crate::finder::FileIndex;
    use crate::install_once;

    // =========================================================================
    // Palette Delegate
    // =========================================================================

    /// Feeds the palette from a [`FileIndex`].
    pub struct FileFinder {
        mtm: MainThreadMarker,
        index: FileIndex,
    }

    impl QuickOpenDelegate<PathBuf> for FileFinder {
        type Row = Retained<NSView>;

        fn matches_for_query(&mut self, query: &str) -> Vec<PathBuf> {
            self.index.query(query)
        }

        fn view_for_item(&mut self, item: &PathBuf) -> Option<Self::Row> {
            let text = NSString::from_str(&item.to_string_lossy());
            let label = NSTextField::labelWithString(&text, self.mtm);
            Some(Retained::into_super(Retained::into_super(label)))
        }

        fn on_item_selected(&mut self, item: &PathBuf) {
            let path = self.index.root().join(item);
            tracing::info!(path = %path.display(), "selected");
            println!("{}", path.display());
        }

        fn on_window_closed(&mut self) {
            tracing::debug!("palette closed, terminating");
            NSApplication::sharedApplication(self.mtm).terminate(None);
        }
    }

    // =========================================================================
    // Application Delegate
    // =========================================================================

    /// Internal state for our application delegate
    struct AppDelegateIvars {
        /// Directory the finder indexes
        root: PathBuf,
        /// The palette (kept alive by the delegate)
        palette: OnceCell<QuickOpenPalette<PathBuf, FileFinder>>,
    }

    define_class!(
        // SAFETY: AppDelegate follows the correct Objective-C memory management rules
        // and is only accessed from the main thread
        #[unsafe(super = NSObject)]
        #[thread_kind = MainThreadOnly]
        #[ivars = AppDelegateIvars]
        #[name = "QuickOpenDemoAppDelegate"]
        struct AppDelegate;

        // SAFETY: NSObjectProtocol is correctly implemented - we inherit from NSObject
        unsafe impl NSObjectProtocol for AppDelegate {}

        // SAFETY: NSApplicationDelegate protocol methods are implemented correctly
        // with proper signatures matching the Objective-C protocol
        unsafe impl NSApplicationDelegate for AppDelegate {
            #[unsafe(method(applicationDidFinishLaunching:))]
            fn application_did_finish_launching(&self, _notification: &NSNotification) {
                let mtm = MainThreadMarker::from(self);
                self.setup_palette(mtm);
            }
        }
    );

    impl AppDelegate {
        fn new(mtm: MainThreadMarker, root: PathBuf) -> Retained<Self> {
            let this = mtm.alloc::<Self>();
            let this = this.set_ivars(AppDelegateIvars {
                root,
                palette: OnceCell::new(),
            });
            unsafe { msg_send![super(this), init] }
        }

        fn setup_palette(&self, mtm: MainThreadMarker) {
            let index = FileIndex::build(self.ivars().root.clone());
            if index.is_empty() {
                tracing::warn!(root = %index.root().display(), "no files to search");
            } else {
                tracing::info!(files = index.len(), "palette ready");
            }
            let options = PaletteOptions::load_or_default();
            let palette = QuickOpenPalette::new(mtm, options, Some(FileFinder { mtm, index }));

            palette.show();
            install_once(&self.ivars().palette, palette);
        }
    }

    pub fn run(root: PathBuf) {
        let Some(mtm) = MainThreadMarker::new() else {
            tracing::error!("quick-open-demo must start on the main thread");
            std::process::exit(1);
        };

        let app = NSApplication::sharedApplication(mtm);

        // No Dock icon; the palette floats over whatever app is in front
        app.setActivationPolicy(NSApplicationActivationPolicy::Accessory);

        let delegate = AppDelegate::new(mtm, root);
        let delegate_obj: &ProtocolObject<dyn NSApplicationDelegate> =
            ProtocolObject::from_ref(&*delegate);
        app.setDelegate(Some(delegate_obj));

        app.run();
    }
}

fn main() {
    init_logging();
    tracing::info!("Starting quick-open-demo v{}", env!("CARGO_PKG_VERSION"));

    let root = search_root();

    #[cfg(target_os = "macos")]
    app::run(root);

    #[cfg(not(target_os = "macos"))]
    {
        // Index anyway so the finder can be exercised from the command line
        let index = FileIndex::build(root);
        tracing::error!(
            root = %index.root().display(),
            files = index.len(),
            "the palette window requires macOS"
        );
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::OnceCell;

    #[test]
    fn test_install_once_keeps_first_value() {
        let cell = OnceCell::new();

        assert!(install_once(&cell, 1));
        assert!(!install_once(&cell, 2));
        assert_eq!(cell.get(), Some(&1));
    }
}

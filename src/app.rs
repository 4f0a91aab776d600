use adw::Application;
use log::{info, warn};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::api::client::ApiClient;
use crate::api::http_backend_factory;
use crate::assistant::{AssistantHandle, AssistantService};
use crate::profile::SettingsData;
use crate::shell::Shell;
use crate::storage::{ConfigStore, FileConfigStore, MemoryConfigStore};

/// Everything the windows share. Lives on the GTK main thread; only the
/// assistant handle crosses into the Tokio runtime.
#[derive(Clone)]
pub struct AppContext {
    pub assistant: AssistantHandle,
    pub shell: Rc<RefCell<Shell>>,
    pub settings: Rc<RefCell<SettingsData>>,
    pub http: ApiClient,
}

impl AppContext {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        let service = AssistantService::new(store, http_backend_factory());
        let configured = service.is_configured();
        Self {
            assistant: AssistantHandle::new(service),
            shell: Rc::new(RefCell::new(Shell::new(configured))),
            settings: Rc::new(RefCell::new(SettingsData::default())),
            http: ApiClient::new(),
        }
    }

    /// Config in the user's config dir, or an in-memory store when there is none.
    pub fn load() -> Self {
        let store: Arc<dyn ConfigStore> = match FileConfigStore::in_user_config_dir() {
            Ok(store) => {
                info!("Assistant config in {}", store.dir().display());
                Arc::new(store)
            }
            Err(e) => {
                warn!("{}; assistant settings will not persist", e);
                Arc::new(MemoryConfigStore::new())
            }
        };
        Self::new(store)
    }
}

pub fn build_ui(app: &Application) {
    let ctx = AppContext::load();
    crate::ui::main_window::show_main_window(app, ctx);
}

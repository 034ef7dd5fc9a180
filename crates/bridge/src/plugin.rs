//! Host engine shell boundary.

use std::sync::Arc;

use tracing::{debug, error};

use crate::manager::SurfaceBridge;
use crate::view::RootContainerView;

/// Registration surface the host engine shell drives.
///
/// The shell constructs a plugin once and owns it for its own lifetime;
/// there is no global plugin state. View hooks run on the UI/main thread,
/// which is why the plugin (not the bridge) owns the root container view.
pub trait EnginePlugin {
    /// Name the plugin registers under.
    fn plugin_name(&self) -> &'static str;

    /// Methods exposed to the host's scripting layer; none by default.
    fn plugin_methods(&self) -> Vec<String> {
        Vec::new()
    }

    /// Descriptor resources for native libraries the plugin carries.
    fn native_library_paths(&self) -> Vec<String> {
        Vec::new()
    }

    /// Invoked on the UI/main thread when the host creates its view
    /// hierarchy; returns the container parenting all surface views.
    fn on_main_create_view(&mut self) -> &mut RootContainerView;

    /// Invoked when the host engine's main loop begins.
    fn on_main_loop_started(&self);

    /// Invoked while the host view is being torn down.
    fn on_main_destroy(&self);
}

/// Shipped [`EnginePlugin`] implementation wiring a [`SurfaceBridge`] to its
/// root container view.
pub struct BridgePlugin {
    bridge: Arc<SurfaceBridge>,
    root_view: RootContainerView,
}

impl BridgePlugin {
    pub fn new(bridge: Arc<SurfaceBridge>) -> Self {
        Self {
            bridge,
            root_view: RootContainerView::new(),
        }
    }

    pub fn bridge(&self) -> &Arc<SurfaceBridge> {
        &self.bridge
    }

    pub fn root_view(&self) -> &RootContainerView {
        &self.root_view
    }

    pub fn root_view_mut(&mut self) -> &mut RootContainerView {
        &mut self.root_view
    }
}

impl EnginePlugin for BridgePlugin {
    fn plugin_name(&self) -> &'static str {
        "vitrine-core"
    }

    fn native_library_paths(&self) -> Vec<String> {
        vec!["plugin/v1/vitrine/vitrinelib.desc".to_string()]
    }

    fn on_main_create_view(&mut self) -> &mut RootContainerView {
        &mut self.root_view
    }

    fn on_main_loop_started(&self) {
        debug!("main loop started, initializing {}", self.plugin_name());
        if let Err(err) = self.bridge.start() {
            error!("failed to start surface bridge: {err}");
        }
    }

    fn on_main_destroy(&self) {
        debug!("shutting down {}", self.plugin_name());
        if let Err(err) = self.bridge.stop() {
            error!("failed to stop surface bridge: {err}");
        }
    }
}

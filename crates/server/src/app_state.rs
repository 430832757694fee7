use server_api::ProxyContext;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) proxy: ProxyContext,
}

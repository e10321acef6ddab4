// A host application for the `native_bridge` static library. Like a real
// host, it never calls the bridge's exports directly; a foreign-function
// bridge would look them up by name after startup.

use native_bridge as _;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    #[cfg(feature = "anchor")]
    {
        let status = native_bridge::retain_native_symbols();
        tracing::debug!(status, "retention anchor called");
    }

    tracing::info!("host started");
}

use std::collections::HashMap;
use std::net::{IpAddr, Ipv6Addr, SocketAddr};
use std::sync::{Arc, Mutex};

use anyhow::Context as _;
use futures::future;
use futures_util::StreamExt;
use tarpc::context;
use tarpc::server::{self, Channel};
use tarpc::tokio_serde::formats::Json;
use tarpc::client;
use tracing_subscriber::EnvFilter;

use student_server::directory::StudentDirectory;
use student_server::*;

#[cfg(test)]
mod service_test;

/// Name-to-endpoint directory. Rebinding a name replaces the previous entry.
#[derive(Clone, Default)]
struct RegistryServer {
    bindings: Arc<Mutex<HashMap<String, SocketAddr>>>,
}

impl Registry for RegistryServer {
    type RebindFut = future::Ready<()>;
    type LookupFut = future::Ready<Option<SocketAddr>>;

    fn rebind(self, _: context::Context, name: String, addr: SocketAddr) -> Self::RebindFut {
        tracing::info!(%name, %addr, "rebind");
        self.bindings.lock().unwrap().insert(name, addr);
        future::ready(())
    }

    fn lookup(self, _: context::Context, name: String) -> Self::LookupFut {
        let addr = self.bindings.lock().unwrap().get(&name).copied();
        tracing::info!(%name, found = addr.is_some(), "lookup");
        future::ready(addr)
    }
}

/// Thin shim exposing the directory over the wire. The directory is never
/// mutated after seeding, so sharing it across request tasks needs no lock.
#[derive(Clone)]
struct StudentServer {
    directory: Arc<StudentDirectory>,
}

impl StudentService for StudentServer {
    type GetStudentDetailsFut = future::Ready<QueryReply<StudentRecord>>;
    type GetGradeFut = future::Ready<QueryReply<Grade>>;
    type IsPassFut = future::Ready<QueryReply<bool>>;

    fn get_student_details(
        self,
        _: context::Context,
        roll_no: u32,
    ) -> Self::GetStudentDetailsFut {
        future::ready(self.directory.details(roll_no))
    }

    fn get_grade(self, _: context::Context, roll_no: u32) -> Self::GetGradeFut {
        future::ready(self.directory.grade(roll_no))
    }

    fn is_pass(self, _: context::Context, roll_no: u32) -> Self::IsPassFut {
        future::ready(self.directory.pass(roll_no))
    }
}

/// Start the registry listener and return the address it is bound to.
async fn serve_registry(
    listen_addr: (IpAddr, u16),
    registry: RegistryServer,
) -> anyhow::Result<SocketAddr> {
    let mut listener = tarpc::serde_transport::tcp::listen(&listen_addr, Json::default).await?;
    listener.config_mut().max_frame_length(usize::MAX);
    let local_addr = listener.local_addr();

    tokio::spawn(
        listener
            // Ignore accept errors.
            .filter_map(|r| future::ready(r.ok()))
            .map(server::BaseChannel::with_defaults)
            .for_each(move |channel| {
                let registry = registry.clone();
                async move {
                    tokio::spawn(channel.execute(registry.serve()));
                }
            }),
    );

    Ok(local_addr)
}

/// Start the student service listener and return the address it is bound to.
async fn serve_students(
    listen_addr: (IpAddr, u16),
    directory: Arc<StudentDirectory>,
) -> anyhow::Result<SocketAddr> {
    let mut listener = tarpc::serde_transport::tcp::listen(&listen_addr, Json::default).await?;
    listener.config_mut().max_frame_length(usize::MAX);
    let local_addr = listener.local_addr();
    let server = StudentServer { directory };

    tokio::spawn(
        listener
            .filter_map(|r| future::ready(r.ok()))
            .map(server::BaseChannel::with_defaults)
            .for_each(move |channel| {
                let server = server.clone();
                async move {
                    tokio::spawn(channel.execute(server.serve()));
                }
            }),
    );

    Ok(local_addr)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let registry_addr = serve_registry(
        (IpAddr::V6(Ipv6Addr::LOCALHOST), REGISTRY_PORT),
        RegistryServer::default(),
    )
    .await
    .context("failed to start the registry listener")?;
    tracing::info!(%registry_addr, "registry listening");

    // The service itself takes an ephemeral port; the registry binding is
    // what makes it findable.
    let service_addr = serve_students(
        (IpAddr::V6(Ipv6Addr::LOCALHOST), 0),
        Arc::new(StudentDirectory::with_seed_records()),
    )
    .await
    .context("failed to start the student service listener")?;
    tracing::info!(%service_addr, "student service listening");

    // Publish the endpoint through the registry's own wire interface, the
    // same path a remote peer would use.
    let transport = tarpc::serde_transport::tcp::connect(registry_addr, Json::default)
        .await
        .context("failed to connect to the registry")?;
    let registry = RegistryClient::new(client::Config::default(), transport).spawn();
    registry
        .rebind(context::current(), SERVICE_NAME.to_string(), service_addr)
        .await
        .context("failed to publish the student service")?;

    tracing::info!(name = SERVICE_NAME, "student service published");
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    Ok(())
}

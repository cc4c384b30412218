use std::net::{IpAddr, Ipv6Addr};
use std::time::Duration;

use anyhow::Context as _;
use tarpc::tokio_serde::formats::Json;
use tarpc::{client, context};

use student_server::*;

/// Roll number queried by the demo run.
const ROLL_NO: u32 = 101;

fn banner(title: &str) {
    println!("\n=== {title} ===");
}

async fn run_demo() -> anyhow::Result<()> {
    let registry_addr = (IpAddr::V6(Ipv6Addr::LOCALHOST), REGISTRY_PORT);

    banner("Connecting to the student registry");
    let transport = tarpc::serde_transport::tcp::connect(registry_addr, || Json::default())
        .await
        .context("cannot reach the registry")?;
    let registry = RegistryClient::new(client::Config::default(), transport).spawn();

    let service_addr = registry
        .lookup(context::current(), SERVICE_NAME.to_string())
        .await
        .context("registry lookup failed")?
        .with_context(|| format!("nothing bound under \"{SERVICE_NAME}\""))?;
    println!("Resolved \"{SERVICE_NAME}\" to {service_addr}");

    let transport = tarpc::serde_transport::tcp::connect(service_addr, || Json::default())
        .await
        .context("cannot reach the student service")?;
    let service = StudentServiceClient::new(client::Config::default(), transport).spawn();

    let mut ctx = context::current();
    ctx.deadline = context::current().deadline + Duration::from_secs(5);

    println!("Requesting data for roll no {ROLL_NO}");

    banner("Student details");
    match service.get_student_details(ctx.clone(), ROLL_NO).await? {
        QueryReply::Success(record) => {
            println!("Name  : {}", record.name);
            println!("Marks : {}", record.marks);
        }
        QueryReply::Error { message } => println!("Error: {message}"),
    }

    banner("Grade");
    match service.get_grade(ctx.clone(), ROLL_NO).await? {
        QueryReply::Success(grade) => println!("Grade : {grade}"),
        QueryReply::Error { message } => println!("Error: {message}"),
    }

    banner("Examination result");
    match service.is_pass(ctx.clone(), ROLL_NO).await? {
        QueryReply::Success(pass) => println!("Result: {}", if pass { "PASS" } else { "FAIL" }),
        QueryReply::Error { message } => println!("Error: {message}"),
    }

    banner("Done");
    println!("All remote calls executed successfully.");
    Ok(())
}

#[tokio::main]
async fn main() {
    // Every transport or lookup failure funnels here; there are no retries.
    if let Err(e) = run_demo().await {
        eprintln!("client error: {e:#}");
        std::process::exit(1);
    }
}

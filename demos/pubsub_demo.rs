//! Routing demo: sensors publishing to plain, wildcard and queued handlers.
//!
//! ```bash
//! RUST_LOG=sublist=debug cargo run --example pubsub_demo
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use sublist::{PubSub, SubscribeOptions, SublistConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a compact tracing subscriber when `RUST_LOG` is set; stays
/// silent otherwise.
fn setup_tracing() {
	let Ok(filter) = tracing_subscriber::EnvFilter::try_from_default_env()
	else {
		return;
	};
	tracing_subscriber::registry()
		.with(filter)
		.with(
			tracing_subscriber::fmt::layer()
				.with_target(true)
				.with_thread_ids(false)
				.compact(),
		)
		.init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	setup_tracing();

	let config = SublistConfig::default().with_cache(64, 16);
	let hub = PubSub::<f64>::with_config(config)?;

	let _room1 = hub.subscribe("sensors.temperature.room1", |subject, value| {
		println!("[room1]     {subject} = {value:.1}");
	})?;
	let _all_temps = hub.subscribe("sensors.temperature.*", |subject, value| {
		println!("[all temps] {subject} = {value:.1}");
	})?;
	let _audit = hub.debug_subscribe(
		"sensors.>",
		SubscribeOptions::new(),
		|subject, _, matches| {
			println!(
				"[audit]     {subject}: {} plain, {} groups",
				matches.plain_len(),
				matches.groups().len()
			);
		},
	)?;

	let processed = Arc::new([AtomicUsize::new(0), AtomicUsize::new(0)]);
	let mut workers = Vec::new();
	for worker in 0 .. 2 {
		let processed = Arc::clone(&processed);
		workers.push(hub.subscribe_with(
			"sensors.>",
			SubscribeOptions::new().with_queue("storage"),
			move |_, _| {
				processed[worker].fetch_add(1, Ordering::Relaxed);
			},
		)?);
	}

	for (i, room) in ["room1", "room2", "room3"].iter().cycle().take(12).enumerate() {
		let subject = format!("sensors.temperature.{room}");
		let delivered = hub.publish(&subject, &(20.0 + i as f64 / 4.0));
		println!("-> {subject}: {delivered} deliveries");
	}

	println!(
		"storage workers processed {} / {} messages",
		processed[0].load(Ordering::Relaxed),
		processed[1].load(Ordering::Relaxed)
	);
	println!("{:#?}", hub.sublist().stats());
	Ok(())
}

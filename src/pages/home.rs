use leptos::prelude::*;
use serde_json::{Value, json};

use crate::components::traffic_graph::TrafficGraphCanvas;
use crate::engine::{FilterConfig, Graph, filter_graph, ingest, linearize};

const EXTERNAL_HOSTS: &[(&str, &str, &str)] = &[
	("api.vendor-cloud.com", "important_external", "cloud"),
	("time.pool.ntp.org", "low_priority", "server"),
	("cdn.firmware.net", "important_external", "server"),
	("dns.resolver.net", "secondary_external", "dns"),
	("telemetry.ads.io", "secondary_external", "server"),
	("mqtt.broker.io", "important_external", "cloud"),
	("upnp.lan.scan", "low_priority", "device"),
];

const PROTOCOLS: &[&str] = &["HTTPS", "DNS", "MQTT", "TCP", "UDP", "NTP"];

/// Generate a sample capture around one monitored device (deterministic for consistency).
fn generate_sample_payload() -> Value {
	let mut nodes = vec![
		json!({"id": "camera", "resolvedLabel": "Door Camera", "category": "real_device",
			"type": "device", "resolutionSource": "known_device", "trafficValue": 5200}),
		json!({"id": "router", "label": "Home Router", "category": "real_device", "type": "gateway"}),
		json!({"id": "speaker", "label": "Speaker", "category": "real_device",
			"resolutionSource": "vendor_pattern", "trafficValue": 830}),
	];
	let mut edges = vec![
		json!({"source": "camera", "target": "router", "protocol": "TCP", "strength": 0.95,
			"packets": 4200, "bytes": 3_100_000}),
		json!({"source": "router", "target": "camera", "protocol": "TCP", "strength": 0.7,
			"packets": 900, "bytes": 120_000}),
		json!({"source": "speaker", "target": "router", "protocol": "UDP", "strength": 0.4,
			"packets": 300, "bytes": 42_000}),
	];

	for (i, (host, category, kind)) in EXTERNAL_HOSTS.iter().enumerate() {
		nodes.push(json!({"id": host, "label": host, "category": category, "type": kind}));
		let strength = (rand_simple(i) * 100.0).round() / 100.0;
		edges.push(json!({
			"source": "router",
			"target": host,
			"protocol": PROTOCOLS[i % PROTOCOLS.len()],
			"strength": strength,
			"packets": (strength * 1000.0) as u64,
			"bytes": (strength * 250_000.0) as u64,
		}));
	}

	json!({ "nodes": nodes, "edges": edges })
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let graph_data: Signal<Graph> = Signal::derive(move || ingest(&generate_sample_payload()));

	let show_external = RwSignal::new(true);
	let show_low_priority = RwSignal::new(false);
	let threshold = RwSignal::new(0.0_f64);
	let config = Signal::derive(move || FilterConfig {
		show_external_nodes: show_external.get(),
		show_low_priority_nodes: show_low_priority.get(),
		strength_threshold: threshold.get(),
	});

	let flow = Memo::new(move |_| linearize(&filter_graph(&graph_data.get(), &config.get())));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<TrafficGraphCanvas data=graph_data config=config fullscreen=true />
				<div class="graph-overlay">
					<h1>"Device Traffic"</h1>
					<p class="subtitle">"Hover a node to focus its connections. Scroll to zoom. Drag to pan."</p>
					<label>
						<input
							type="checkbox"
							prop:checked=move || show_external.get()
							on:change=move |ev| show_external.set(event_target_checked(&ev))
						/>
						" External endpoints"
					</label>
					<label>
						<input
							type="checkbox"
							prop:checked=move || show_low_priority.get()
							on:change=move |ev| show_low_priority.set(event_target_checked(&ev))
						/>
						" Low-priority endpoints"
					</label>
					<label>
						" Min strength "
						<input
							type="range"
							min="0"
							max="1"
							step="0.05"
							prop:value=move || threshold.get().to_string()
							on:input=move |ev| {
								if let Ok(v) = event_target_value(&ev).parse::<f64>() {
									threshold.set(v);
								}
							}
						/>
						{move || format!(" {:.2}", threshold.get())}
					</label>
					{move || {
						let diagram = flow.get();
						if diagram.is_empty() {
							view! { <p class="empty">"No renderable flow"</p> }.into_any()
						} else {
							view! {
								<ul class="flow-links">
									{diagram
										.named_links()
										.into_iter()
										.map(|l| {
											view! {
												<li>{format!("{} → {} ({})", l.source, l.target, l.value)}</li>
											}
										})
										.collect_view()}
								</ul>
							}
								.into_any()
						}
					}}
				</div>
			</div>
		</ErrorBoundary>
	}
}

use leptos::prelude::*;

use crate::components::flow::FlowCanvas;
use crate::components::gyroscope::GyroscopeCanvas;
use crate::components::kernel::{KernelCanvas, KernelStyle};
use crate::components::rings::RingsCanvas;

/// Landing page: the gyroscope hero followed by the three diagrams.
#[component]
pub fn Home() -> impl IntoView {
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

			<section class="hero" style="position: relative; height: 100vh; overflow: hidden;">
				<GyroscopeCanvas />
				<div class="hero-overlay" style="position: absolute; inset: 0; pointer-events: none;">
					<h1>"Holon"</h1>
					<p class="subtitle">"A kernel of invariants, wrapped in rings of rules and interfaces."</p>
				</div>
			</section>

			<section class="flow">
				<h2>"How a request moves"</h2>
				<FlowCanvas />
			</section>

			<section class="kernel reveal">
				<h2>"The kernel"</h2>
				<KernelCanvas style=KernelStyle::Trails />
			</section>

			<section class="motif">
				<RingsCanvas />
			</section>
		</ErrorBoundary>
	}
}

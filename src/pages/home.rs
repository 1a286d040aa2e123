use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info};
use thiserror::Error;

use crate::components::chord_diagram::{
	ChordDiagramCanvas, DataError, DiagramData, LabelMap, MatrixBuilder, MatrixError, fetch_records,
};

/// URL of the record file, served next to the app.
const DATA_URL: &str = "data.csv";

#[derive(Clone, Debug, Error, PartialEq)]
enum LoadError {
	#[error(transparent)]
	Data(#[from] DataError),
	#[error(transparent)]
	Matrix(#[from] MatrixError),
}

/// Fetches the records and runs the matrix pipeline. Labels are indexed
/// from `Source` and extended from `Target`, so entities that only ever
/// appear as targets still get an arc.
async fn load_diagram() -> Result<DiagramData, LoadError> {
	let records = fetch_records(DATA_URL).await?;
	let mut labels = LabelMap::from_field(&records, |r| &r.source);
	labels.add_values(&records, |r| &r.target);
	let matrix = MatrixBuilder::new(&records).build(&labels)?;
	info!("loaded {} records, {} entities", records.len(), labels.len());
	Ok(DiagramData { labels, matrix })
}

/// Default Home Page: fetch once, then build matrix, layout and diagram.
/// Rendering is deferred until the load completes; a failed load is
/// terminal and replaces the diagram with the error.
#[component]
pub fn Home() -> impl IntoView {
	let loaded: RwSignal<Option<Result<DiagramData, LoadError>>> = RwSignal::new(None);

	spawn_local(async move {
		let result = load_diagram().await;
		if let Err(ref e) = result {
			error!("loading diagram data failed: {e}");
		}
		loaded.set(Some(result));
	});

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

			<div class="fullscreen-diagram">
				{move || match loaded.get() {
					None => view! { <p class="diagram-status">"Loading data…"</p> }.into_any(),
					Some(Err(e)) => {
						view! {
							<p class="diagram-status diagram-error">
								"Could not load the diagram: " {e.to_string()}
							</p>
						}
							.into_any()
					}
					Some(Ok(data)) => {
						let data = Signal::derive(move || data.clone());
						view! { <ChordDiagramCanvas data=data fullscreen=true /> }.into_any()
					}
				}}
				<div class="diagram-overlay">
					<h1>"Dependency Chord Diagram"</h1>
					<p class="subtitle">
						"Hover an arc to highlight its relationships. Hover a chord for both directions."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}

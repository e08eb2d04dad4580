use std::collections::HashSet;

use kazani::application::render::{KazaniRenderService, RenderRequest, RenderService};
use kazani::domain::assets::NoAssets;
use kazani::infra::telemetry;
use metrics_util::debugging::DebuggingRecorder;

#[test]
fn render_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");
    telemetry::describe_metrics();

    let service = KazaniRenderService::default();

    // Successful render with one unresolved asset and one unknown emoji reference.
    service
        .render(
            &RenderRequest::structured(
                r#"[{"type":"paragraph","content":[{"type":"link","url":"$missing"},{"type":"emoji","name":"no_such_emoji"}]}]"#,
            ),
            &NoAssets,
        )
        .expect("soft degrades do not fail the render");

    // Failed render.
    service
        .render(&RenderRequest::structured("not json"), &NoAssets)
        .expect_err("malformed structured content fails");

    let snapshot = snapshotter.snapshot().into_vec();

    let names: HashSet<String> = snapshot
        .iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        "kazani_render_total",
        "kazani_render_failed_total",
        "kazani_render_ms",
        "kazani_render_asset_unresolved_total",
        "kazani_render_shortcode_miss_total",
    ];

    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }

    let labelled = snapshot.iter().any(|(composite_key, _, _, _)| {
        composite_key.key().name() == "kazani_render_total"
            && composite_key
                .key()
                .labels()
                .any(|label| label.key() == "content_type" && label.value() == "structured")
    });
    assert!(labelled, "render counter should carry the content type");
}

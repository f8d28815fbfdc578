//! Case orchestration with recording disabled, so the runner's control
//! flow is testable without a display or ffmpeg.

use webharness::{CaseRunner, HarnessConfig};

fn no_record_config() -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.record = false;
    config
}

#[tokio::test]
async fn passing_body_reports_ok() {
    let runner = CaseRunner::new(no_record_config()).unwrap();

    let result = runner
        .run_case("smoke", |cx| {
            Box::pin(async move {
                assert_eq!(cx.case_name(), "smoke");
                assert!(cx.sessions.is_empty());
                cx.step("first step");
                cx.step("second step");
                Ok(())
            })
        })
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn failing_body_surfaces_the_error_after_cleanup() {
    let runner = CaseRunner::new(no_record_config()).unwrap();

    let result = runner
        .run_case("broken", |cx| {
            Box::pin(async move {
                cx.step("about to fail");
                Err(std::io::Error::other("element never appeared").into())
            })
        })
        .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("element never appeared"));
}

#[tokio::test]
async fn runner_is_reusable_across_cases() {
    let runner = CaseRunner::new(no_record_config()).unwrap();

    for name in ["first", "second"] {
        runner
            .run_case(name, |cx| {
                Box::pin(async move {
                    cx.step("only step");
                    Ok(())
                })
            })
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn invalid_recording_config_fails_runner_construction() {
    let mut config = HarnessConfig::default();
    config.record = true;
    config.recording.fps = 0.0;

    assert!(CaseRunner::new(config).is_err());
}

// Integration tests for PageLoader
//
// All timing runs against the fake clock, so the 90s/30s/5s budgets are
// exercised without real waits.

mod fake;

use std::time::Duration;

use fake::{FakeClock, FakePage, QueryBehavior};
use holdfast::{LoadConfig, LoadOutcome, PageLoader, Query};

const BACKOFF: Duration = Duration::from_secs(5);
const SETTLE_DELAY: Duration = Duration::from_secs(3);

fn loader(clock: FakeClock) -> PageLoader<FakeClock> {
    PageLoader::with_clock(
        LoadConfig::default().with_identity_marker("Chapter"),
        clock,
    )
}

#[tokio::test]
async fn clean_load_succeeds_on_first_attempt_without_backoff() {
    let page = FakePage::new();
    page.push_title("Chapter — Home Page");

    let clock = FakeClock::new();
    let outcome = loader(clock.clone())
        .load(&page, "https://example.org/")
        .await;

    assert_eq!(
        outcome,
        LoadOutcome::Succeeded {
            title: "Chapter — Home Page".to_string(),
            attempts: 1,
        }
    );
    assert_eq!(page.goto_count(), 1);
    // Only the settle delay; no retry backoff was incurred.
    assert_eq!(clock.sleeps(), vec![SETTLE_DELAY]);
}

#[tokio::test]
async fn navigation_errors_exhaust_attempts_with_fixed_backoff() {
    let page = FakePage::new();
    page.push_goto_error("net::ERR_CONNECTION_RESET");
    page.push_goto_error("net::ERR_CONNECTION_RESET");
    page.push_goto_error("net::ERR_CONNECTION_RESET");

    let clock = FakeClock::new();
    let outcome = loader(clock.clone())
        .load(&page, "https://example.org/")
        .await;

    assert_eq!(outcome, LoadOutcome::Exhausted { attempts: 3 });
    assert_eq!(page.goto_count(), 3);
    // A backoff between attempts, none after the last.
    assert_eq!(clock.sleeps(), vec![BACKOFF, BACKOFF]);
}

#[tokio::test]
async fn interstitial_that_clears_leads_to_success() {
    let page = FakePage::new();
    // Observed at challenge check, once while polling, then the real title.
    page.push_title("Just a moment...");
    page.push_title("Just a moment...");
    page.push_title("Chapter — Home Page");

    let clock = FakeClock::new();
    let outcome = loader(clock.clone())
        .load(&page, "https://example.org/index.php")
        .await;

    assert!(outcome.succeeded());
    assert_eq!(page.goto_count(), 1);
    // The post-clearance settle ran.
    assert_eq!(page.settle_count(), 1);
    // Clearance well inside the ten-second window.
    assert!(clock.elapsed() <= Duration::from_secs(10));
}

#[tokio::test]
async fn challenge_that_never_clears_fails_each_attempt() {
    let page = FakePage::new();
    page.push_title("Just a moment...");

    let clock = FakeClock::new();
    let outcome = loader(clock.clone())
        .load(&page, "https://example.org/")
        .await;

    assert_eq!(outcome, LoadOutcome::Exhausted { attempts: 3 });
    assert_eq!(page.goto_count(), 3);
    // Each attempt burned its clearance budget before giving up.
    let polls = clock
        .sleeps()
        .iter()
        .filter(|d| **d == Duration::from_millis(500))
        .count();
    assert!(polls >= 3 * 60);
    assert_eq!(
        clock.sleeps().iter().filter(|d| **d == BACKOFF).count(),
        2
    );
}

#[tokio::test]
async fn entry_path_with_nontrivial_title_passes_without_identity_marker() {
    let page = FakePage::new();
    page.push_title("Upcoming Events and Webinars");

    let clock = FakeClock::new();
    let loader = PageLoader::with_clock(LoadConfig::default(), clock);
    let outcome = loader
        .load(&page, "https://example.org/index.php")
        .await;

    assert!(outcome.succeeded());
}

#[tokio::test]
async fn unknown_page_without_identity_marker_exhausts() {
    let page = FakePage::new();
    page.push_title("Some Unrelated Portal");

    let clock = FakeClock::new();
    let loader = PageLoader::with_clock(LoadConfig::default(), clock);
    let outcome = loader
        .load(&page, "https://example.org/calendar")
        .await;

    assert_eq!(outcome, LoadOutcome::Exhausted { attempts: 3 });
}

#[tokio::test]
async fn max_attempts_override_is_honored() {
    let page = FakePage::new();
    page.push_goto_error("timeout");

    let clock = FakeClock::new();
    let loader = PageLoader::with_clock(
        LoadConfig::default().with_max_attempts(1),
        clock.clone(),
    );
    let outcome = loader.load(&page, "https://example.org/").await;

    assert_eq!(outcome, LoadOutcome::Exhausted { attempts: 1 });
    assert!(clock.sleeps().is_empty());
}

#[tokio::test]
async fn wait_ready_resolves_once_body_has_children() {
    let page = FakePage::new();
    page.on_query(
        Query::Css("body > *".to_string()),
        QueryBehavior::Visible("main"),
    );

    let clock = FakeClock::new();
    let loader = PageLoader::with_clock(LoadConfig::default(), clock.clone());
    loader.wait_ready(&page).await.unwrap();

    assert_eq!(page.settle_count(), 2);
    // Script-init delay only; the first body probe hit.
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(2)]);
}

#[tokio::test]
async fn wait_ready_is_best_effort_on_an_empty_body() {
    let page = FakePage::new();

    let clock = FakeClock::new();
    let loader = PageLoader::with_clock(LoadConfig::default(), clock.clone());
    // No matching body children; the probe times out but does not fail.
    loader.wait_ready(&page).await.unwrap();

    assert!(clock.elapsed() >= Duration::from_secs(7));
}

mod helper;

use std::sync::atomic::Ordering;

use commit_to_tag::tag::error::{ResolveError, SourceError};
use commit_to_tag::tag::prerelease::PrereleaseClassifier;
use commit_to_tag::tag::resolver::TagResolver;
use commit_to_tag::tag::types::{Resolution, Tag};
use rstest::rstest;

use helper::{FixtureTagSource, date, linux_tags};

const COMMIT: &str = "1e28eed17697";

fn releases() -> Vec<Tag> {
    vec![
        Tag::new("v5.12", date("2021-03-28T22:48:16Z")),
        Tag::new("v5.11", date("2021-03-21T22:48:16Z")),
        Tag::new("v5.10", date("2021-03-14T22:48:16Z")),
    ]
}

async fn resolve(tags: Vec<Tag>, commit_date: &str) -> Result<Resolution, ResolveError> {
    let source = FixtureTagSource::new(tags).with_commit(COMMIT, Some(date(commit_date)));
    TagResolver::new(source, PrereleaseClassifier::default())
        .resolve(COMMIT)
        .await
}

#[rstest]
#[case("2021-03-20T08:33:34Z", Resolution::Found("v5.11".to_string()))]
#[case("2021-03-13T08:33:34Z", Resolution::Found("v5.10".to_string()))]
#[case("2021-03-28T22:48:16Z", Resolution::Found("v5.12".to_string()))]
#[case("2021-03-29T08:33:34Z", Resolution::Unmerged)]
#[tokio::test]
async fn resolve_release_tags(#[case] commit_date: &str, #[case] expected: Resolution) {
    assert_eq!(resolve(releases(), commit_date).await.unwrap(), expected);
}

#[tokio::test]
async fn resolve_empty_tags_is_unknown() {
    assert_eq!(
        resolve(Vec::new(), "2021-03-13T08:33:34Z").await.unwrap(),
        Resolution::Unknown
    );
}

#[tokio::test]
async fn resolve_all_prerelease_tags_is_unknown() {
    let tags = vec![
        Tag::new("v5.12-rc", date("2021-03-28T22:48:16Z")),
        Tag::new("v5.11-rc-dont-use", date("2021-03-21T22:48:16Z")),
        Tag::new("v5.10-rc", date("2021-03-14T22:48:16Z")),
    ];

    assert_eq!(
        resolve(tags, "2021-03-29T08:33:34Z").await.unwrap(),
        Resolution::Unknown
    );
}

#[rstest]
#[case("2019-07-31T09:00:46Z", Resolution::Found("v5.3".to_string()))]
#[case("2019-07-01T00:00:00Z", Resolution::Found("v5.3".to_string()))] // older than every tag
#[case("2020-11-30T00:00:00Z", Resolution::Found("v5.10".to_string()))] // lands on v5.10-rc7
#[case("2020-12-13T22:41:30Z", Resolution::Found("v5.10".to_string()))] // exact release date
#[case("2020-10-12T00:00:00Z", Resolution::Found("v5.10".to_string()))] // just after v5.9
#[case("2021-03-01T00:00:00Z", Resolution::Unknown)] // only v5.12 pre-releases are newer
#[case("2030-01-01T00:00:00Z", Resolution::Unknown)] // newest tag is a pre-release
#[tokio::test]
async fn resolve_against_linux_tag_history(
    #[case] commit_date: &str,
    #[case] expected: Resolution,
) {
    assert_eq!(resolve(linux_tags(), commit_date).await.unwrap(), expected);
}

#[tokio::test]
async fn resolve_unknown_commit_propagates_not_found() {
    let source = FixtureTagSource::new(releases());
    let resolver = TagResolver::new(source, PrereleaseClassifier::default());

    let result = resolver.resolve("12345789abc").await;

    assert!(matches!(
        result,
        Err(ResolveError::Source(SourceError::NotFound(_)))
    ));
}

#[tokio::test]
async fn resolve_commit_without_date_fails_before_fetching_tags() {
    let source = FixtureTagSource::new(releases()).with_commit(COMMIT, None);
    let tag_fetches = source.tag_fetches();
    let resolver = TagResolver::new(source, PrereleaseClassifier::default());

    let result = resolver.resolve(COMMIT).await;

    assert!(matches!(result, Err(ResolveError::CommitDateUnknown(_))));
    assert_eq!(tag_fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn resolve_fetches_fresh_tags_for_every_resolution() {
    let source = FixtureTagSource::new(releases())
        .with_commit(COMMIT, Some(date("2021-03-20T08:33:34Z")))
        .with_commit("a5e13c6df0e4", Some(date("2021-03-28T22:48:16Z")));
    let tag_fetches = source.tag_fetches();
    let resolver = TagResolver::new(source, PrereleaseClassifier::default());

    assert_eq!(
        resolver.resolve(COMMIT).await.unwrap(),
        Resolution::Found("v5.11".to_string())
    );
    assert_eq!(
        resolver.resolve("a5e13c6df0e4").await.unwrap(),
        Resolution::Found("v5.12".to_string())
    );
    assert_eq!(tag_fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn resolve_with_custom_prerelease_pattern() {
    let tags = vec![
        Tag::new("v2.0.0", date("2021-03-28T22:48:16Z")),
        Tag::new("v2.0.0-beta.2", date("2021-03-21T22:48:16Z")),
        Tag::new("v2.0.0-beta.1", date("2021-03-14T22:48:16Z")),
        Tag::new("v1.9.0", date("2021-03-07T22:48:16Z")),
    ];
    let source =
        FixtureTagSource::new(tags).with_commit(COMMIT, Some(date("2021-03-10T00:00:00Z")));
    let classifier = PrereleaseClassifier::pattern(r"-(alpha|beta)").unwrap();

    let result = TagResolver::new(source, classifier)
        .resolve(COMMIT)
        .await
        .unwrap();

    assert_eq!(result, Resolution::Found("v2.0.0".to_string()));
}

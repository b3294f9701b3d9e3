use super::*;
use crate::flows::selectors::*;
use crate::test_page::{ClickEffect, FakeNode, FakePage, RecordingBackground};
use feedpilot_protocols::Request;

const INVITATIONS_URL: &str = "https://www.linkedin.com/mynetwork/invitation-manager/";

const CARD_IDS: [&str; 15] = [
    "card1", "card2", "card3", "card4", "card5", "card6", "card7", "card8", "card9", "card10",
    "card11", "card12", "card13", "card14", "card15",
];
const ACCEPT_IDS: [&str; 15] = [
    "accept1", "accept2", "accept3", "accept4", "accept5", "accept6", "accept7", "accept8",
    "accept9", "accept10", "accept11", "accept12", "accept13", "accept14", "accept15",
];
const LINK_IDS: [&str; 15] = [
    "link1", "link2", "link3", "link4", "link5", "link6", "link7", "link8", "link9", "link10",
    "link11", "link12", "link13", "link14", "link15",
];

fn flow(
    page: &Arc<FakePage>,
    session: &Arc<FlowSession>,
    background: &Arc<RecordingBackground>,
) -> AcceptFlow {
    AcceptFlow::new(
        page.clone(),
        session.clone(),
        background.clone(),
        Pacer::default(),
        FlowSettings::default(),
    )
}

/// Add `n` invitation cards, each with a profile link and an accept button.
fn add_cards(page: &FakePage, n: usize) {
    for i in 0..n {
        page.add(FakeNode::new(CARD_IDS[i], "li").matches(&[INVITATION_CARD]));
        page.add(
            FakeNode::new(LINK_IDS[i], "a")
                .href(&format!("https://www.linkedin.com/in/person-{}/", i + 1))
                .matches(&[PROFILE_LINK])
                .child_of(CARD_IDS[i]),
        );
        page.add(
            FakeNode::button(ACCEPT_IDS[i])
                .label("Accept invitation")
                .text("Accept")
                .matches(&[ACCEPT_BUTTON])
                .child_of(CARD_IDS[i]),
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_processes_up_to_max_count_in_order() {
    let page = FakePage::new(INVITATIONS_URL);
    add_cards(&page, 15);
    let session = Arc::new(FlowSession::new());
    let background = RecordingBackground::new();

    let report = flow(&page, &session, &background).run(10).await.unwrap();

    assert!(report.success);
    assert_eq!(report.processed, 10);
    assert_eq!(report.total, 15);
    assert!(report.errors.is_empty());
    assert_eq!(page.clicks(), ACCEPT_IDS[..10].to_vec());

    let opened: Vec<String> = background
        .requests()
        .into_iter()
        .filter_map(|r| match r {
            Request::CreateBackgroundTab { url } => Some(url),
            _ => None,
        })
        .collect();
    assert_eq!(opened.len(), 10);
    assert_eq!(opened[0], "https://www.linkedin.com/in/person-1/");
    assert_eq!(opened[9], "https://www.linkedin.com/in/person-10/");
}

#[tokio::test(start_paused = true)]
async fn test_failing_card_is_isolated() {
    let page = FakePage::new(INVITATIONS_URL);
    for i in 0..5 {
        page.add(FakeNode::new(CARD_IDS[i], "li").matches(&[INVITATION_CARD]));
        let mut accept = FakeNode::button(ACCEPT_IDS[i])
            .label("Accept")
            .matches(&[ACCEPT_BUTTON])
            .child_of(CARD_IDS[i]);
        if i == 2 {
            accept = accept.on_click(ClickEffect::Fail("click intercepted"));
        }
        page.add(accept);
    }
    let session = Arc::new(FlowSession::new());
    let background = RecordingBackground::new();

    let report = flow(&page, &session, &background).run(5).await.unwrap();

    assert!(report.success);
    assert_eq!(report.processed, 4);
    assert_eq!(report.total, 5);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].index, 3);
    assert!(report.errors[0].message.contains("click intercepted"));
    // The failing click is still attempted; later cards carry on.
    assert_eq!(
        page.clicks(),
        vec!["accept1", "accept2", "accept3", "accept4", "accept5"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_wrong_page_fails_fast() {
    let page = FakePage::new("https://www.linkedin.com/feed/");
    add_cards(&page, 2);
    let session = Arc::new(FlowSession::new());
    let background = RecordingBackground::new();

    let result = flow(&page, &session, &background).run(10).await;

    match result {
        Err(FlowError::WrongPage(msg)) => assert_eq!(msg, MSG_WRONG_PAGE),
        other => panic!("Expected WrongPage, got {:?}", other),
    }
    assert!(page.clicks().is_empty());
    assert!(!session.is_processing());
}

#[tokio::test(start_paused = true)]
async fn test_no_invitations_is_success() {
    let page = FakePage::new(INVITATIONS_URL);
    let session = Arc::new(FlowSession::new());
    let background = RecordingBackground::new();

    let report = flow(&page, &session, &background).run(10).await.unwrap();

    assert!(report.success);
    assert_eq!(report.processed, 0);
    assert_eq!(report.total, 0);
    assert_eq!(report.message.as_deref(), Some(MSG_NO_INVITATIONS));
}

#[tokio::test(start_paused = true)]
async fn test_hidden_accept_controls_are_not_eligible() {
    let page = FakePage::new(INVITATIONS_URL);
    add_cards(&page, 2);
    page.add(FakeNode::new("card-hidden", "li").matches(&[INVITATION_CARD]));
    page.add(
        FakeNode::button("accept-hidden")
            .matches(&[ACCEPT_BUTTON])
            .child_of("card-hidden")
            .hidden(),
    );
    page.add(FakeNode::new("card-sent", "li").matches(&[INVITATION_CARD]));
    let session = Arc::new(FlowSession::new());
    let background = RecordingBackground::new();

    let report = flow(&page, &session, &background).run(10).await.unwrap();

    assert_eq!(report.total, 2);
    assert_eq!(report.processed, 2);
}

#[tokio::test(start_paused = true)]
async fn test_card_without_link_and_rejected_tab_still_counts() {
    let page = FakePage::new(INVITATIONS_URL);
    page.add(FakeNode::new("card1", "li").matches(&[INVITATION_CARD]));
    page.add(
        FakeNode::button("accept1")
            .matches(&[ACCEPT_BUTTON])
            .child_of("card1"),
    );
    page.add(FakeNode::new("card2", "li").matches(&[INVITATION_CARD]));
    page.add(
        FakeNode::new("link2", "a")
            .href("https://www.linkedin.com/in/person-2/")
            .matches(&[PROFILE_LINK])
            .child_of("card2"),
    );
    page.add(
        FakeNode::button("accept2")
            .matches(&[ACCEPT_BUTTON])
            .child_of("card2"),
    );
    let session = Arc::new(FlowSession::new());
    let background = RecordingBackground::rejecting_create();

    let report = flow(&page, &session, &background).run(10).await.unwrap();

    assert_eq!(report.processed, 2);
    assert!(report.errors.is_empty());
    assert_eq!(background.count("createBackgroundTab"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_busy_session() {
    let page = FakePage::new(INVITATIONS_URL);
    add_cards(&page, 1);
    let session = Arc::new(FlowSession::new());
    let background = RecordingBackground::new();

    let _guard = session.try_begin().unwrap();
    let report = flow(&page, &session, &background).run(1).await.unwrap();

    assert!(!report.success);
    assert_eq!(report.error.as_deref(), Some(MSG_ALREADY_PROCESSING));
    assert!(page.clicks().is_empty());
}

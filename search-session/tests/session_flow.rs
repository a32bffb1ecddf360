use cloudnav_resource_search::Resource;
use cloudnav_resource_search::SearchEngine;
use cloudnav_search_session::SearchSession;
use cloudnav_search_session::SessionConfig;
use cloudnav_search_session::SessionEffect;
use cloudnav_search_session::SessionKey;
use cloudnav_search_session::SessionState;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn engine() -> Arc<SearchEngine> {
    let engine = SearchEngine::default();
    engine.set_resources(vec![
        Resource::new("1", "web-vm-01", "Microsoft.Compute/virtualMachines", "eastus")
            .with_resource_group("rg-east")
            .with_tag("env", "prod"),
        Resource::new("2", "web-vm-02", "Microsoft.Compute/virtualMachines", "westus")
            .with_resource_group("rg-west")
            .with_tag("env", "dev"),
        Resource::new("3", "ops-vault", "Microsoft.KeyVault/vaults", "eastus")
            .with_resource_group("rg-ops"),
    ]);
    Arc::new(engine)
}

fn session() -> SearchSession {
    SearchSession::new(engine(), SessionConfig::default())
}

fn type_text(session: &mut SearchSession, text: &str) -> SessionEffect {
    let mut effect = SessionEffect::None;
    for ch in text.chars() {
        effect = session.handle_key(SessionKey::Char(ch));
    }
    effect
}

fn result_names(session: &SearchSession) -> Vec<&str> {
    session
        .results()
        .iter()
        .map(|result| result.name.as_str())
        .collect()
}

#[test]
fn keys_are_ignored_until_search_is_entered() {
    let mut session = session();
    assert_eq!(session.state(), SessionState::Inactive);
    assert_eq!(session.handle_key(SessionKey::Char('w')), SessionEffect::None);
    assert_eq!(session.query(), "");
    assert!(session.shows_unfiltered());
}

#[test]
fn typing_refreshes_results_and_suggestions() {
    let mut session = session();
    session.enter();
    assert_eq!(type_text(&mut session, "web"), SessionEffect::Refreshed);
    assert_eq!(session.state(), SessionState::Active);
    assert_eq!(result_names(&session), vec!["web-vm-01", "web-vm-02"]);
    assert_eq!(
        session.suggestions(),
        &["web-vm-01".to_string(), "web-vm-02".to_string()]
    );
    assert!(!session.shows_unfiltered());
}

#[test]
fn single_character_gets_no_suggestions() {
    let mut session = session();
    session.enter();
    type_text(&mut session, "w");
    assert!(session.suggestions().is_empty());
    // web-vm-02 also matches on its location and resource group.
    assert_eq!(result_names(&session), vec!["web-vm-02", "web-vm-01"]);
}

#[test]
fn inline_suggestions_are_capped() {
    let mut session = SearchSession::new(
        engine(),
        SessionConfig {
            inline_suggestions: 2,
            ..Default::default()
        },
    );
    session.enter();
    type_text(&mut session, "we");
    assert_eq!(session.suggestions().len(), 3);
    assert_eq!(
        session.inline_suggestions(),
        &["westus".to_string(), "web-vm-01".to_string()]
    );
}

#[test]
fn selection_wraps_in_both_directions() {
    let mut session = session();
    session.enter();
    type_text(&mut session, "web");

    assert_eq!(
        session.handle_key(SessionKey::Down),
        SessionEffect::LoadDetails("1".to_string())
    );
    assert_eq!(
        session.handle_key(SessionKey::Down),
        SessionEffect::LoadDetails("2".to_string())
    );
    assert_eq!(
        session.handle_key(SessionKey::Down),
        SessionEffect::LoadDetails("1".to_string())
    );
    assert_eq!(
        session.handle_key(SessionKey::Up),
        SessionEffect::LoadDetails("2".to_string())
    );
    assert_eq!(session.selected(), Some(1));
    assert_eq!(session.selected_result().map(|r| r.name.as_str()), Some("web-vm-02"));
}

#[test]
fn first_up_selects_the_last_row() {
    let mut session = session();
    session.enter();
    type_text(&mut session, "web");
    assert_eq!(
        session.handle_key(SessionKey::Up),
        SessionEffect::LoadDetails("2".to_string())
    );
}

#[test]
fn selection_without_results_does_nothing() {
    let mut session = session();
    session.enter();
    type_text(&mut session, "nonexistent");
    assert!(session.results().is_empty());
    assert_eq!(session.handle_key(SessionKey::Down), SessionEffect::None);
    assert_eq!(session.selected(), None);
}

#[test]
fn enter_commits_and_typing_resumes() {
    let mut session = session();
    session.enter();
    type_text(&mut session, "vault");
    assert_eq!(session.handle_key(SessionKey::Enter), SessionEffect::None);
    assert_eq!(session.state(), SessionState::ResultsShown);
    assert_eq!(session.history().get(0), Some("vault"));
    assert_eq!(result_names(&session), vec!["ops-vault"]);

    session.handle_key(SessionKey::Backspace);
    assert_eq!(session.state(), SessionState::Active);
    assert_eq!(session.query(), "vaul");
}

#[test]
fn escape_restores_the_unfiltered_view() {
    let mut session = session();
    session.enter();
    type_text(&mut session, "web");
    session.handle_key(SessionKey::Down);
    assert_eq!(
        session.handle_key(SessionKey::Escape),
        SessionEffect::RestoreUnfiltered
    );
    assert_eq!(session.state(), SessionState::Inactive);
    assert_eq!(session.query(), "");
    assert!(session.results().is_empty());
    assert_eq!(session.selected(), None);
    assert!(session.shows_unfiltered());
}

#[test]
fn clearing_the_query_clears_the_filter() {
    let mut session = session();
    session.enter();
    type_text(&mut session, "we");
    session.handle_key(SessionKey::Backspace);
    session.handle_key(SessionKey::Backspace);
    assert_eq!(session.query(), "");
    assert!(session.results().is_empty());
    assert!(session.shows_unfiltered());
    assert_eq!(session.handle_key(SessionKey::Backspace), SessionEffect::None);
}

#[test]
fn history_recall_walks_back_and_restores_the_draft() {
    let mut session = session();
    for query in ["web", "vault"] {
        session.enter();
        type_text(&mut session, query);
        session.handle_key(SessionKey::Enter);
    }
    assert_eq!(session.history().iter().collect::<Vec<_>>(), vec!["vault", "web"]);

    session.enter();
    type_text(&mut session, "ops");
    session.handle_key(SessionKey::HistoryPrev);
    assert_eq!(session.query(), "vault");
    assert_eq!(result_names(&session), vec!["ops-vault"]);
    session.handle_key(SessionKey::HistoryPrev);
    assert_eq!(session.query(), "web");
    assert_eq!(session.handle_key(SessionKey::HistoryPrev), SessionEffect::None);
    assert_eq!(session.query(), "web");

    session.handle_key(SessionKey::HistoryNext);
    assert_eq!(session.query(), "vault");
    session.handle_key(SessionKey::HistoryNext);
    assert_eq!(session.query(), "ops");
    assert_eq!(session.handle_key(SessionKey::HistoryNext), SessionEffect::None);
}

#[test]
fn history_keeps_twenty_most_recent_queries() {
    let mut session = session();
    session.enter();
    for idx in 0..21 {
        session.enter();
        type_text(&mut session, &format!("q{idx}"));
        session.handle_key(SessionKey::Enter);
    }
    let history: Vec<&str> = session.history().iter().collect();
    assert_eq!(history.len(), 20);
    assert_eq!(history.first(), Some(&"q20"));
    assert_eq!(history.last(), Some(&"q1"));
}

#[test]
fn tab_completes_the_trailing_filter_value() {
    let mut session = session();
    session.enter();
    type_text(&mut session, "type:vm location:ea");
    assert_eq!(session.suggestions(), &["eastus".to_string()]);
    assert_eq!(
        session.handle_key(SessionKey::AcceptSuggestion),
        SessionEffect::Refreshed
    );
    assert_eq!(session.query(), "type:vm location:eastus");
    assert_eq!(result_names(&session), vec!["web-vm-01"]);
}

#[test]
fn tab_without_suggestions_is_a_no_op() {
    let mut session = session();
    session.enter();
    type_text(&mut session, "web ");
    assert_eq!(
        session.handle_key(SessionKey::AcceptSuggestion),
        SessionEffect::None
    );
    assert_eq!(session.query(), "web ");
}

fn owner_session(owners: &[(&str, &str)]) -> SearchSession {
    let engine = SearchEngine::default();
    engine.set_resources(
        owners
            .iter()
            .enumerate()
            .map(|(idx, &(name, owner))| {
                Resource::new(idx.to_string(), name, "Microsoft.Web/sites", "eastus")
                    .with_tag("owner", owner)
            })
            .collect(),
    );
    let mut session = SearchSession::new(Arc::new(engine), SessionConfig::default());
    session.enter();
    session
}

#[test]
fn tab_refuses_a_value_that_would_split_into_terms() {
    let mut session = owner_session(&[("web", "Platform Team"), ("api", "Team Platform")]);
    type_text(&mut session, "tag:owner=pla");
    assert_eq!(session.suggestions(), &["Platform Team".to_string()]);
    let before: Vec<String> = result_names(&session).into_iter().map(str::to_string).collect();

    assert_eq!(
        session.handle_key(SessionKey::AcceptSuggestion),
        SessionEffect::None
    );
    assert_eq!(session.query(), "tag:owner=pla");
    assert_eq!(result_names(&session), before);
}

#[test]
fn tab_skips_to_the_first_single_token_suggestion() {
    let mut session = owner_session(&[
        ("web", "Platform Team"),
        ("api", "Team Platform"),
        ("db", "Platform Team"),
        ("cache", "platform-ops"),
    ]);
    type_text(&mut session, "tag:owner=pla");
    assert_eq!(
        session.suggestions(),
        &["Platform Team".to_string(), "platform-ops".to_string()]
    );
    assert_eq!(
        session.handle_key(SessionKey::AcceptSuggestion),
        SessionEffect::Refreshed
    );
    assert_eq!(session.query(), "tag:owner=platform-ops");
    assert_eq!(result_names(&session), vec!["cache"]);
}

#[test]
fn filter_values_suggest_only_from_their_field() {
    let mut session = session();
    session.enter();
    type_text(&mut session, "we");
    assert_eq!(
        session.suggestions(),
        &[
            "westus".to_string(),
            "web-vm-01".to_string(),
            "web-vm-02".to_string(),
        ]
    );

    session.enter();
    type_text(&mut session, "location:we");
    assert_eq!(session.suggestions(), &["westus".to_string()]);

    session.enter();
    type_text(&mut session, "rg:rg-");
    assert_eq!(
        session.suggestions(),
        &[
            "rg-ops".to_string(),
            "rg-east".to_string(),
            "rg-west".to_string(),
        ]
    );

    session.enter();
    type_text(&mut session, "type:microsoft.k");
    assert_eq!(session.suggestions(), &["Microsoft.KeyVault/vaults".to_string()]);

    session.enter();
    type_text(&mut session, "tag:en");
    assert_eq!(session.suggestions(), &["env".to_string()]);

    session.enter();
    type_text(&mut session, "tag:env=de");
    assert_eq!(session.suggestions(), &["dev".to_string()]);
}

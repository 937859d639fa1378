use tsuzuri_core::config::Config;
use tsuzuri_core::piece::{InputPiece, KeyModifiers};

use super::super::segments::{cyclic_index, SegmentManager};
use super::super::state::InputState;
use super::MockProvider;

fn manager() -> SegmentManager<MockProvider> {
    SegmentManager::new(MockProvider::new(), Config::default())
}

fn pieces(text: &str) -> Vec<InputPiece> {
    text.chars()
        .map(|c| InputPiece::Key {
            intention: None,
            input: c,
            modifiers: KeyModifiers::NONE,
        })
        .collect()
}

#[test]
fn test_cyclic_index_wraps() {
    assert_eq!(cyclic_index(0, 1, 3), 1);
    assert_eq!(cyclic_index(2, 1, 3), 0);
    assert_eq!(cyclic_index(0, -1, 3), 2);
    assert_eq!(cyclic_index(5, 1, 0), 0);
}

#[test]
fn test_merged_candidates_dedup_by_text() {
    let mut m = manager();
    m.insert(pieces("kyouha"), None);
    let candidates = m.effective_candidates().unwrap();
    let texts: Vec<&str> = candidates.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["今日", "今日は", "kyouha"]);
    // No text appears twice even if both lists carry it.
    let mut sorted = texts.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), texts.len());
}

#[test]
fn test_segment_edit_switches_to_main_results_only() {
    let mut m = manager();
    m.insert(pieces("kyouha"), None);
    m.edit_segment(-1, None);
    // After editing, the request narrows and clause merging stops.
    assert_eq!(m.provider().requests.last().map(String::as_str), Some("kyouh"));
    let texts: Vec<String> = m
        .effective_candidates()
        .unwrap()
        .into_iter()
        .map(|c| c.text)
        .collect();
    assert_eq!(texts, ["kyouh"]);
}

#[test]
fn test_segment_edit_from_right_edge_restarts_left() {
    let mut m = manager();
    m.insert(pieces("kyouha"), None);
    // First widen from the right edge jumps to one char from the left.
    m.edit_segment(1, None);
    assert_eq!(m.provider().requests.last().map(String::as_str), Some("k"));
    // Subsequent widening extends normally.
    m.edit_segment(1, None);
    assert_eq!(m.provider().requests.last().map(String::as_str), Some("ky"));
}

#[test]
fn test_segment_edit_never_reaches_zero_width() {
    let mut m = manager();
    m.insert(pieces("ka"), None);
    m.edit_segment(-1, None);
    m.edit_segment(-1, None);
    m.edit_segment(-1, None);
    // The clause floor is one character.
    assert_eq!(m.provider().requests.last().map(String::as_str), Some("k"));
}

#[test]
fn test_delete_after_edit_resets_to_full_buffer() {
    let mut m = manager();
    m.insert(pieces("kyouha"), None);
    m.edit_segment(-2, None);
    m.delete_backward(1, None);
    // Deletion snaps the cursor back to the end first.
    assert_eq!(m.provider().requests.last().map(String::as_str), Some("kyouh"));
    let texts: Vec<String> = m
        .effective_candidates()
        .unwrap()
        .into_iter()
        .map(|c| c.text)
        .collect();
    assert_eq!(texts, ["kyouh"]);
}

#[test]
fn test_selection_walk_clamps_at_zero() {
    let mut m = manager();
    m.insert(pieces("kyou"), None);
    m.select_prev_candidate();
    assert_eq!(m.selected_candidate().unwrap().text, "今日");
    m.select_next_candidate();
    m.select_next_candidate();
    assert_eq!(m.selected_candidate().unwrap().text, "kyou");
}

#[test]
fn test_marked_text_after_delete_shows_raw_input() {
    let mut m = manager();
    m.insert(pieces("kyou"), None);
    assert_eq!(
        m.current_marked_text(&InputState::Composing).concatenated(),
        "今日"
    );
    m.delete_backward(1, None);
    assert_eq!(
        m.current_marked_text(&InputState::Composing).concatenated(),
        "kyo"
    );
}

#[test]
fn test_commit_marked_text_feeds_learning() {
    let mut m = manager();
    m.insert(pieces("kyou"), None);
    let text = m.commit_marked_text(&InputState::Composing);
    assert_eq!(text, "今日");
    assert_eq!(m.provider().learned, ["今日"]);
    assert!(m.is_empty());
}

#[test]
fn test_commit_and_retype_round_trip() {
    let mut m = manager();
    m.insert(pieces("kyou"), None);
    let first = m.current_marked_text(&InputState::Composing);
    let committed = m.commit_marked_text(&InputState::Composing);
    assert_eq!(committed, first.concatenated());
    assert!(m.is_empty());

    // Re-entering the same key sequence reproduces the same rendering.
    m.insert(pieces("kyou"), None);
    let second = m.current_marked_text(&InputState::Composing);
    assert_eq!(second, first);
}

#[test]
fn test_forget_selected_reports_to_provider() {
    let mut m = manager();
    m.insert(pieces("kyou"), None);
    m.select_row(0);
    m.forget_selected();
    assert_eq!(m.provider().forgotten, ["今日"]);
}

#[test]
fn test_debug_log_is_capped() {
    let mut m = manager();
    for i in 0..150 {
        m.append_debug_message(&format!("message {i}"));
    }
    m.set_debug_window(true);
    m.set_candidate_window_visible(true);
    let window = m.candidate_window(&InputState::Selecting);
    let super::super::segments::CandidateWindow::List { candidates, .. } = window else {
        panic!("expected debug list");
    };
    assert_eq!(candidates.len(), 100);
    // Newest entry first.
    assert_eq!(candidates[0].text, "message 149");
}

#[test]
fn test_reconversion_shadow_and_stop() {
    let mut m = manager();
    m.insert(pieces("kyou"), None);
    let recon = m.build_reconversion_candidates("キョウ");
    m.set_reconversion_candidates(recon);
    assert_eq!(m.effective_candidates().unwrap()[0].text, "キョウ");
    m.stop_composition();
    assert!(m.effective_candidates().is_none());
    assert!(m.is_empty());
}

#[test]
fn test_reconversion_variant_rows_and_scores() {
    let mut m = manager();
    let rows = m.build_reconversion_candidates("きょう");
    let texts: Vec<&str> = rows.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["きょう", "今日", "キョウ", "ｷｮｳ"]);
    assert_eq!(rows[0].score, 0.0);
    assert_eq!(rows[2].score, -2.0);
    assert_eq!(rows[3].score, -3.0);

    // Roman text gains the width-converted rows.
    let rows = m.build_reconversion_candidates("abc");
    let texts: Vec<&str> = rows.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["abc", "ａｂｃ"]);
    assert_eq!(rows[1].score, -4.0);

    let rows = m.build_reconversion_candidates("ＡＢ");
    let texts: Vec<&str> = rows.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["ＡＢ", "AB"]);
    assert_eq!(rows[1].score, -5.0);
}

#[test]
fn test_separator_not_duplicated() {
    let mut m = manager();
    m.insert(pieces("kyou"), None);
    let before = m.provider().requests.len();
    m.insert_separator(true, None);
    m.insert_separator(true, None);
    m.update(true, None);
    // Only the explicit update issued a request; the second separator
    // was a no-op.
    assert_eq!(m.provider().requests.len(), before + 1);
    assert_eq!(m.convert_target(), "kyou");
}

#[test]
fn test_empty_buffer_clears_candidates_and_stops_provider() {
    let mut m = manager();
    m.insert(pieces("k"), None);
    m.delete_backward(1, None);
    assert!(m.effective_candidates().is_none());
    assert_eq!(m.provider().stop_count, 1);
}

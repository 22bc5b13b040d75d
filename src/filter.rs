use crate::catalog::Catalog;
use crate::models::{Item, Topic};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchReason {
    Topic,
    Items,
}

#[derive(Debug, Clone)]
pub struct TopicMatch<'a> {
    pub topic: &'a Topic,
    pub items: Vec<&'a Item>,
    pub reason: MatchReason,
}

/// `Inactive` means "show the whole catalog"; `Matched(vec![])` means a filter
/// is active and found nothing.
#[derive(Debug, Clone)]
pub enum FilterOutcome<'a> {
    Inactive,
    Matched(Vec<TopicMatch<'a>>),
}

impl FilterOutcome<'_> {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::Matched(topics) if topics.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct FilterState<'a> {
    pub query: String,
    pub outcome: FilterOutcome<'a>,
}

/// Case-insensitive substring match. A name or description hit keeps the
/// whole topic, an item-name hit keeps only matching items.
pub fn filter<'a>(catalog: &'a Catalog, query: &str) -> FilterState<'a> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return FilterState {
            query: query.to_string(),
            outcome: FilterOutcome::Inactive,
        };
    }

    let matches = catalog
        .topics()
        .iter()
        .filter_map(|topic| match_topic(topic, &needle))
        .collect();

    FilterState {
        query: query.to_string(),
        outcome: FilterOutcome::Matched(matches),
    }
}

fn match_topic<'a>(topic: &'a Topic, needle: &str) -> Option<TopicMatch<'a>> {
    // a topic with nothing to show is never a result
    if topic.items.is_empty() {
        return None;
    }

    if contains(&topic.name, needle) || contains(&topic.description, needle) {
        return Some(TopicMatch {
            topic,
            items: topic.items.iter().collect(),
            reason: MatchReason::Topic,
        });
    }

    let items: Vec<&Item> = topic
        .items
        .iter()
        .filter(|item| contains(&item.name, needle))
        .collect();
    if items.is_empty() {
        return None;
    }

    Some(TopicMatch {
        topic,
        items,
        reason: MatchReason::Items,
    })
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_json(
            br#"{"topics":[
                {"id":"word","name":"Word Games","description":"Letters and guesses","icon":"",
                 "games":[
                    {"id":"wordle","name":"Wordle","url":"u"},
                    {"id":"spelling","name":"Spelling Bee","url":"u"}
                 ]},
                {"id":"puzzle","name":"Puzzles","description":"Logic grids","icon":"",
                 "games":[
                    {"id":"mini","name":"Mini Crossword","url":"u"},
                    {"id":"sudoku","name":"Sudoku","url":"u"},
                    {"id":"queens","name":"Queens","url":"u"}
                 ]},
                {"id":"geo","name":"Geography","description":"Maps","icon":"",
                 "games":[
                    {"id":"worldle","name":"Worldle","url":"u"}
                 ]}
            ]}"#,
        )
        .unwrap()
    }

    fn ids(state: &FilterState<'_>) -> Vec<(String, Vec<String>)> {
        match &state.outcome {
            FilterOutcome::Inactive => panic!("expected an active filter"),
            FilterOutcome::Matched(topics) => topics
                .iter()
                .map(|m| {
                    (
                        m.topic.id.clone(),
                        m.items.iter().map(|item| item.id.clone()).collect(),
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn empty_and_whitespace_queries_are_inactive() {
        let catalog = catalog();
        assert!(!filter(&catalog, "").outcome.is_active());
        assert!(!filter(&catalog, "   \t").outcome.is_active());
    }

    #[test]
    fn no_match_is_active_with_zero_topics() {
        let catalog = catalog();
        let state = filter(&catalog, "zzz-no-match");
        assert!(state.outcome.is_active());
        assert!(state.outcome.is_empty_result());
    }

    #[test]
    fn topic_name_match_keeps_all_items() {
        let catalog = catalog();
        let state = filter(&catalog, "WORD");
        let matched = ids(&state);
        assert_eq!(matched[0], ("word".to_string(), vec!["wordle".to_string(), "spelling".to_string()]));
        if let FilterOutcome::Matched(topics) = &state.outcome {
            assert_eq!(topics[0].reason, MatchReason::Topic);
        }
    }

    #[test]
    fn item_name_match_keeps_only_matching_items() {
        let catalog = catalog();
        let state = filter(&catalog, "sudo");
        assert_eq!(ids(&state), vec![("puzzle".to_string(), vec!["sudoku".to_string()])]);
        if let FilterOutcome::Matched(topics) = &state.outcome {
            assert_eq!(topics[0].reason, MatchReason::Items);
        }
    }

    #[test]
    fn description_match_keeps_all_items() {
        let catalog = catalog();
        let state = filter(&catalog, "logic");
        assert_eq!(
            ids(&state),
            vec![(
                "puzzle".to_string(),
                vec!["mini".to_string(), "sudoku".to_string(), "queens".to_string()]
            )]
        );
    }

    #[test]
    fn results_preserve_catalog_order_across_topics() {
        let catalog = catalog();
        let state = filter(&catalog, "wordle");
        assert_eq!(ids(&state), vec![("word".to_string(), vec!["wordle".to_string()])]);
        let state = filter(&catalog, "orld");
        assert_eq!(
            ids(&state),
            vec![("geo".to_string(), vec!["worldle".to_string()])]
        );
        let state = filter(&catalog, "e");
        let topics: Vec<String> = ids(&state).into_iter().map(|(topic, _)| topic).collect();
        assert_eq!(topics, vec!["word", "puzzle", "geo"]);
    }

    #[test]
    fn topic_match_without_items_is_dropped() {
        let catalog = Catalog::from_json(
            br#"{"topics":[
                {"id":"a","name":"Word","games":[]},
                {"id":"b","name":"Wordy","games":[{"id":"x","name":"X","url":"u"}]}
            ]}"#,
        )
        .unwrap();
        let state = filter(&catalog, "word");
        assert_eq!(ids(&state), vec![("b".to_string(), vec!["x".to_string()])]);
    }

    #[test]
    fn query_is_trimmed_before_matching() {
        let catalog = catalog();
        let state = filter(&catalog, "  queens ");
        assert_eq!(ids(&state), vec![("puzzle".to_string(), vec!["queens".to_string()])]);
        assert_eq!(state.query, "  queens ");
    }
}

use crate::date::DayIndex;

use super::model::{MergedTask, MergedTaskList, Overlay, TaskList};

/// Applies `overlay` to `base`, day by day.
///
/// For every base day the overlay's title and description win when present;
/// otherwise the main-language text is kept. Overlay entries for days the
/// base list does not have are ignored. With no overlay the result is the
/// base list unchanged.
///
/// `base` is expected to have passed [`TaskList::validate`]; entries whose
/// day number falls outside the countdown are dropped.
pub fn merge(base: &TaskList, overlay: Option<&Overlay>) -> MergedTaskList {
    let days = base
        .days
        .iter()
        .filter_map(|task| {
            let day = DayIndex::new(task.day)?;
            let entry = overlay.and_then(|o| o.get(task.day));
            let title = entry.and_then(|e| e.title.clone());
            let description = entry.and_then(|e| e.description.clone());
            let translated = title.is_some() || description.is_some();
            Some(MergedTask {
                day,
                title: title.unwrap_or_else(|| task.title.clone()),
                description: description.unwrap_or_else(|| task.description.clone()),
                translated,
            })
        })
        .collect();

    MergedTaskList {
        id: base.id.clone(),
        main_language: base.main_language.clone(),
        name: base.name.clone(),
        description: base.description.clone(),
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::model::fixtures::base_list;
    use crate::tasks::model::OverlayEntry;

    fn day(n: u32) -> DayIndex {
        DayIndex::new(n).unwrap()
    }

    fn title(list: &MergedTaskList, n: u32) -> &str {
        &list.task(day(n)).unwrap().title
    }

    #[test]
    fn test_overlay_title_wins() {
        let mut base = base_list("t");
        base.days[4].title = "A".to_string();
        let mut overlay = Overlay::new();
        overlay.insert(
            5,
            OverlayEntry {
                title: Some("B".to_string()),
                description: None,
            },
        );

        let merged = merge(&base, Some(&overlay));
        assert_eq!(title(&merged, 5), "B");
        // description falls back independently of the title
        assert_eq!(merged.task(day(5)).unwrap().description, "Do thing 5");
        assert!(merged.task(day(5)).unwrap().translated);
        // no entry for day 6
        assert_eq!(title(&merged, 6), base.days[5].title);
        assert!(!merged.task(day(6)).unwrap().translated);
    }

    #[test]
    fn test_without_overlay_is_base() {
        let base = base_list("t");
        let merged = merge(&base, None);
        assert_eq!(merged.days.len(), 40);
        for (task, merged) in base.days.iter().zip(&merged.days) {
            assert_eq!(task.day, merged.day.get());
            assert_eq!(task.title, merged.title);
            assert_eq!(task.description, merged.description);
        }
        assert_eq!(merged.name.as_deref(), Some("Test list"));
    }

    #[test]
    fn test_extra_overlay_days_ignored() {
        let base = base_list("t");
        let mut overlay = Overlay::new();
        for d in [0, 41, 99] {
            overlay.insert(
                d,
                OverlayEntry {
                    title: Some("stray".to_string()),
                    description: Some("stray".to_string()),
                },
            );
        }
        let merged = merge(&base, Some(&overlay));
        assert_eq!(merged.days.len(), 40);
        assert!(merged.days.iter().all(|t| t.title != "stray"));
    }

    #[test]
    fn test_merged_order_matches_base() {
        let base = base_list("t");
        let overlay = Overlay::from_json(r#"{"day40":{"title":"last"},"day1":{"title":"first"}}"#)
            .unwrap();
        let merged = merge(&base, Some(&overlay));
        let order: Vec<u32> = merged.days.iter().map(|t| t.day.get()).collect();
        assert_eq!(order, (1..=40).collect::<Vec<_>>());
        assert_eq!(title(&merged, 1), "first");
        assert_eq!(title(&merged, 40), "last");
    }
}

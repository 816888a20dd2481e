//! Pure reducer: (SelectionState, Interaction) -> (SelectionState, views to refresh)
//!
//! Each filter only reaches the charts downstream of it:
//!
//! | Interaction    | Origin    | Refreshes                      |
//! |----------------|-----------|--------------------------------|
//! | `SetYear`      | selector  | all four                       |
//! | `ToggleRegion` | bar       | bar (dimming), sunburst        |
//! | `ToggleDrill`  | sunburst  | sunburst (dimming), scatter    |
//! | `SetBrush`     | scatter   | scatter (dimming), line        |
//! | `ToggleScale`  | button    | scatter                        |

use super::events::{Interaction, ViewId};
use super::state::{DrillFilter, SelectionState};

/// Result of reducing one interaction
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: SelectionState,
    pub refresh: Vec<ViewId>,
    pub state_hash: u64,
}

fn toggle<T: PartialEq>(current: Option<T>, clicked: T) -> Option<T> {
    match current {
        Some(c) if c == clicked => None,
        _ => Some(clicked),
    }
}

/// Pure reducer function
pub fn reduce(state: &SelectionState, interaction: Interaction) -> Transition {
    let mut next = state.clone();
    next.seq += 1;

    let refresh = match interaction {
        Interaction::SetYear { year } => {
            // Cross-filters from the previous year may name rows that no
            // longer exist; the drill filter and scale mode survive.
            next.year = year;
            next.brushed = None;
            next.region_filter = None;
            ViewId::ALL.to_vec()
        }

        Interaction::ToggleRegion { region } => {
            next.region_filter = toggle(next.region_filter.take(), region);
            vec![ViewId::Bar, ViewId::Sunburst]
        }

        Interaction::ToggleDrill { kind, value } => {
            next.drill_filter = toggle(next.drill_filter.take(), DrillFilter::new(kind, value));
            vec![ViewId::Scatter, ViewId::Sunburst]
        }

        Interaction::SetBrush { countries } => {
            next.brushed = countries.filter(|set| !set.is_empty());
            vec![ViewId::Scatter, ViewId::Line]
        }

        Interaction::ToggleScale => {
            next.scale_mode = next.scale_mode.toggled();
            vec![ViewId::Scatter]
        }
    };

    Transition {
        state_hash: next.hash(),
        state: next,
        refresh,
    }
}

/// Fold a sequence of interactions from `initial`.
pub fn replay<I>(initial: &SelectionState, interactions: I) -> SelectionState
where
    I: IntoIterator<Item = Interaction>,
{
    interactions
        .into_iter()
        .fold(initial.clone(), |state, i| reduce(&state, i).state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Region;
    use crate::scale::ScaleMode;
    use crate::selection::state::DrillKind;
    use std::collections::BTreeSet;

    fn brush(names: &[&str]) -> Interaction {
        Interaction::SetBrush {
            countries: Some(names.iter().map(|s| s.to_string()).collect()),
        }
    }

    fn drill(kind: DrillKind, value: &str) -> Interaction {
        Interaction::ToggleDrill {
            kind,
            value: value.to_string(),
        }
    }

    #[test]
    fn set_year_clears_brush_and_region_but_keeps_drill_and_scale() {
        let s0 = SelectionState::new(2022);
        let s = replay(
            &s0,
            vec![
                brush(&["China"]),
                Interaction::ToggleRegion { region: Region::Asia },
                drill(DrillKind::Region, "Asia"),
                Interaction::ToggleScale,
            ],
        );
        assert!(s.brushed.is_some());

        let t = reduce(&s, Interaction::SetYear { year: 2021 });
        assert_eq!(t.state.year, 2021);
        assert_eq!(t.state.brushed, None);
        assert_eq!(t.state.region_filter, None);
        assert_eq!(
            t.state.drill_filter,
            Some(DrillFilter::new(DrillKind::Region, "Asia"))
        );
        assert_eq!(t.state.scale_mode, ScaleMode::Log);
        assert_eq!(t.refresh, ViewId::ALL.to_vec());
    }

    #[test]
    fn drill_toggles_off_on_second_click() {
        let s0 = SelectionState::new(2022);
        let s1 = reduce(&s0, drill(DrillKind::Region, "Asia")).state;
        assert_eq!(s1.drill_filter, Some(DrillFilter::new(DrillKind::Region, "Asia")));
        let s2 = reduce(&s1, drill(DrillKind::Region, "Asia")).state;
        assert_eq!(s2.drill_filter, None);
    }

    #[test]
    fn drill_on_different_arc_replaces() {
        let s = replay(
            &SelectionState::new(2022),
            vec![drill(DrillKind::Region, "Asia"), drill(DrillKind::Country, "Asia")],
        );
        assert_eq!(s.drill_filter, Some(DrillFilter::new(DrillKind::Country, "Asia")));
    }

    #[test]
    fn region_toggle_and_switch() {
        let s0 = SelectionState::new(2022);
        let s1 = reduce(&s0, Interaction::ToggleRegion { region: Region::Asia }).state;
        assert_eq!(s1.region_filter, Some(Region::Asia));
        let s2 = reduce(&s1, Interaction::ToggleRegion { region: Region::Europe }).state;
        assert_eq!(s2.region_filter, Some(Region::Europe));
        let s3 = reduce(&s2, Interaction::ToggleRegion { region: Region::Europe }).state;
        assert_eq!(s3.region_filter, None);
    }

    #[test]
    fn empty_brush_resets_to_top_n() {
        let s = replay(
            &SelectionState::new(2022),
            vec![
                brush(&["China", "India"]),
                Interaction::SetBrush {
                    countries: Some(BTreeSet::new()),
                },
            ],
        );
        assert_eq!(s.brushed, None);
    }

    #[test]
    fn filters_are_independent() {
        let s = replay(
            &SelectionState::new(2022),
            vec![
                Interaction::ToggleRegion { region: Region::Asia },
                drill(DrillKind::SubRegion, "Western Europe"),
                brush(&["Germany"]),
            ],
        );
        assert_eq!(s.region_filter, Some(Region::Asia));
        assert!(s.drill_filter.is_some());
        assert!(s.is_brushed("Germany"));

        let t = reduce(&s, Interaction::ToggleScale);
        assert_eq!(t.refresh, vec![ViewId::Scatter]);
        assert_eq!(t.state.region_filter, s.region_filter);
        assert_eq!(t.state.drill_filter, s.drill_filter);
        assert_eq!(t.state.brushed, s.brushed);
    }

    #[test]
    fn reduce_is_pure_and_counts_transitions() {
        let s0 = SelectionState::new(2022);
        let a = reduce(&s0, Interaction::ToggleScale);
        let b = reduce(&s0, Interaction::ToggleScale);
        assert_eq!(a, b);
        assert_eq!(s0.seq, 0);
        assert_eq!(a.state.seq, 1);
        assert_eq!(a.state_hash, a.state.hash());
    }
}

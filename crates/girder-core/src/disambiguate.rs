// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Picks the support a demand record refers to.

use crate::model::ValidatedCandidate;

/// The chosen candidate and how far its Xi is from the demand's.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection<'a> {
    /// Chosen candidate.
    pub candidate: &'a ValidatedCandidate,
    /// `|candidate.xi - target|`, when both are known.
    pub deviation: Option<f64>,
}

/// Selects the support for a demand at `target_xi` among `candidates`.
///
/// - No candidate: `None`.
/// - One candidate: that candidate, whatever the positions say.
/// - Several: the one whose Xi is nearest `target_xi`; candidates without Xi
///   never win, and ties keep the earliest. Without a target, or when no
///   candidate has an Xi, the demand stays unresolved.
pub fn select<'a, I>(candidates: I, target_xi: Option<f64>) -> Option<Selection<'a>>
where
    I: IntoIterator<Item = &'a ValidatedCandidate>,
{
    let all: Vec<&ValidatedCandidate> = candidates.into_iter().collect();
    let deviation = |c: &ValidatedCandidate| Some((c.xi? - target_xi?).abs());
    match all.as_slice() {
        [] => None,
        [only] => Some(Selection {
            candidate: *only,
            deviation: deviation(*only),
        }),
        many => {
            target_xi?;
            let mut best: Option<Selection<'a>> = None;
            for &candidate in many {
                let Some(d) = deviation(candidate) else {
                    continue;
                };
                if best.is_some_and(|b| b.deviation.is_some_and(|bd| d >= bd)) {
                    continue;
                }
                best = Some(Selection {
                    candidate,
                    deviation: Some(d),
                });
            }
            best
        }
    }
}

#[cfg(test)]
mod tests {
    use girder_geom::Point2;

    use super::*;

    fn at(supported: &str, xi: Option<f64>) -> ValidatedCandidate {
        ValidatedCandidate {
            host: "V1".into(),
            supported: supported.into(),
            position: Point2::new(0.0, 0.0),
            xi,
            placement: None,
            confirmed: true,
            bearing_width: None,
        }
    }

    #[test]
    fn none_for_no_candidates() {
        let none: [ValidatedCandidate; 0] = [];
        assert!(select(&none, Some(1.0)).is_none());
    }

    #[test]
    fn single_candidate_always_chosen() {
        let only = [at("V2", None)];
        let sel = select(&only, None).unwrap();
        assert_eq!(sel.candidate.supported, "V2");
        assert_eq!(sel.deviation, None);

        let only = [at("V2", Some(100.0))];
        let sel = select(&only, Some(40.0)).unwrap();
        assert_eq!(sel.deviation, Some(60.0));
    }

    #[test]
    fn nearest_wins_among_many() {
        let cands = [at("V2", Some(15.0)), at("V3", Some(4.0)), at("V4", None)];
        let sel = select(&cands, Some(14.0)).unwrap();
        assert_eq!(sel.candidate.supported, "V2");
        assert_eq!(sel.deviation, Some(1.0));
    }

    #[test]
    fn ties_keep_earliest() {
        let cands = [at("V2", Some(10.0)), at("V3", Some(20.0))];
        assert_eq!(select(&cands, Some(15.0)).unwrap().candidate.supported, "V2");
    }

    #[test]
    fn many_without_target_or_xi_is_unresolved() {
        let cands = [at("V2", Some(10.0)), at("V3", Some(20.0))];
        assert!(select(&cands, None).is_none());
        let cands = [at("V2", None), at("V3", None)];
        assert!(select(&cands, Some(3.0)).is_none());
    }
}

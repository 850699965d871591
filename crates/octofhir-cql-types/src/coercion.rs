//! Conversion Resolver
//!
//! The heart of CQL's static semantics: deciding whether one type may be
//! implicitly or explicitly converted into another, at what cost, and
//! with what wrapping, and using that per-operand judgment to pick the
//! single least-converting overload among a set of candidate signatures.
//!
//! Operand-level resolution tries, in increasing score order, every path
//! in the table below and keeps the lowest-scoring one:
//!
//! | Path | Condition | Score |
//! |---|---|---|
//! | Exact match | `invoked == declared` | 0 |
//! | Subtype | invoked is a built-in or model subtype of declared | 1 |
//! | Recursion over base types | for each base `b` of invoked | 1 + child |
//! | Compatible (Any -> T) | invoked is Any | 2 |
//! | Cast out of Choice | invoked is Choice; some arm converts | 3 + child |
//! | Cast into Choice | declared is Choice; invoked converts into some arm | 3 |
//! | Implicit to primitive | model says convertible, invoked is a system type | 4 |
//! | Implicit to class | model says convertible (any source) | 4 or 5 |
//! | Interval<A> -> Interval<B> | A converts to B | 5 |
//! | List<A> -> List<B> | A converts to B | 5 |

use crate::model_info::{ImplicitConversion, ModelInfoProvider};
use crate::type_system::CqlType;
use thiserror::Error;

/// Score attached to a matched conversion path. Lower is preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ConversionScore(pub u32);

/// The conversion path that was selected, carrying enough detail that a
/// caller can build the wrapping node it describes (e.g. an `As` cast, a
/// `ToDecimal` node, a `query ... return` for lists).
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    /// No conversion needed.
    Exact,
    /// `invoked` is a direct subtype of `declared`.
    Subtype,
    /// Reached via a base type of `invoked`; boxes the conversion found
    /// from that base to `declared`.
    Recursive(Box<Conversion>),
    /// `invoked` is `Any`; wrap in a strict-off `As` cast.
    AnyToDeclared,
    /// `invoked` is a Choice; the boxed conversion is from the matching
    /// arm to `declared`.
    ChoiceCastOut(Box<Conversion>),
    /// `declared` is a Choice; `invoked` converts into one of its arms.
    ChoiceCastIn,
    /// Model-registered implicit conversion, `invoked` a system type.
    ImplicitToPrimitive(ImplicitConversion),
    /// Model-registered implicit conversion into a class/named type.
    ImplicitToClass(ImplicitConversion),
    /// `Interval<A> -> Interval<B>`; boxes the `A -> B` conversion,
    /// applied to both endpoints.
    IntervalCovariant(Box<Conversion>),
    /// `List<A> -> List<B>`; boxes the `A -> B` conversion, applied via a
    /// `query ... return` projection.
    ListCovariant(Box<Conversion>),
}

/// A fully resolved operand match: the winning path, its score, and the
/// type-category precedence used to break ties between overloads.
#[derive(Debug, Clone, PartialEq)]
pub struct OperandMatch {
    pub score: ConversionScore,
    pub precedence: u8,
    pub conversion: Conversion,
}

/// Errors raised by the Conversion Resolver.
#[derive(Debug, Clone, Error)]
pub enum ResolverError {
    #[error("no conversion from {from} to {declared}")]
    NoMatch { from: String, declared: String },

    #[error("ambiguous overload match: {0} candidates tied on score and precedence")]
    Ambiguous(usize),

    #[error("operand count mismatch: invocation has {invoked}, signature expects {declared}")]
    ArityMismatch { invoked: usize, declared: usize },

    #[error("no overload matched; {0} candidate signature(s) considered")]
    NoOverloadMatch(usize),

    #[error("generic overload could not be instantiated: {0}")]
    GenericInferenceFailed(String),
}

/// The Conversion Resolver. Holds a reference to the model info provider
/// it consults for subtype and implicit-conversion facts about named
/// (non-System) types.
pub struct ConversionResolver<'m> {
    model: &'m dyn ModelInfoProvider,
}

impl<'m> ConversionResolver<'m> {
    pub fn new(model: &'m dyn ModelInfoProvider) -> Self {
        Self { model }
    }

    /// `operand_convert`: try every applicable path from `invoked` to
    /// `declared`, returning the lowest-scoring match, or `None`.
    ///
    /// Promoting a bare scalar `T` into `List<T>` or `Interval<T>` (list
    /// and interval "demotion" in the source material's terms) is not
    /// attempted here — no path in the table produces it, so such
    /// invocations fall straight through to `NoMatch`. See the Open
    /// Question in DESIGN.md.
    pub fn operand_convert(&self, invoked: &CqlType, declared: &CqlType) -> Option<OperandMatch> {
        let mut candidates: Vec<OperandMatch> = Vec::new();

        if invoked == declared {
            candidates.push(OperandMatch {
                score: ConversionScore(0),
                precedence: declared.category_precedence(),
                conversion: Conversion::Exact,
            });
        }

        if self.is_direct_subtype(invoked, declared) {
            candidates.push(OperandMatch {
                score: ConversionScore(1),
                precedence: declared.category_precedence(),
                conversion: Conversion::Subtype,
            });
        }

        for base in self.model.base_types(invoked) {
            if let Some(child) = self.operand_convert(&base, declared) {
                candidates.push(OperandMatch {
                    score: ConversionScore(child.score.0 + 1),
                    precedence: child.precedence,
                    conversion: Conversion::Recursive(Box::new(child.conversion)),
                });
            }
        }

        if invoked.is_any() && !declared.is_any() {
            candidates.push(OperandMatch {
                score: ConversionScore(2),
                precedence: declared.category_precedence(),
                conversion: Conversion::AnyToDeclared,
            });
        }

        if let CqlType::Choice(arms) = invoked {
            if let Some(best) = arms
                .iter()
                .filter_map(|arm| self.operand_convert(arm, declared))
                .min_by_key(|m| m.score.0)
            {
                candidates.push(OperandMatch {
                    score: ConversionScore(best.score.0 + 3),
                    precedence: best.precedence,
                    conversion: Conversion::ChoiceCastOut(Box::new(best.conversion)),
                });
            }
        }

        if let CqlType::Choice(arms) = declared {
            if arms
                .iter()
                .any(|arm| self.operand_convert(invoked, arm).is_some())
            {
                candidates.push(OperandMatch {
                    score: ConversionScore(3),
                    precedence: declared.category_precedence(),
                    conversion: Conversion::ChoiceCastIn,
                });
            }
        }

        let implicit = self.model.is_implicitly_convertible(invoked, declared);
        if implicit.convertible {
            if invoked.is_primitive() || invoked.is_temporal() || invoked.is_clinical() {
                candidates.push(OperandMatch {
                    score: ConversionScore(4),
                    precedence: declared.category_precedence(),
                    conversion: Conversion::ImplicitToPrimitive(implicit.clone()),
                });
            }
            let score = if matches!(declared, CqlType::Named { .. }) {
                5
            } else {
                4
            };
            candidates.push(OperandMatch {
                score: ConversionScore(score),
                precedence: declared.category_precedence(),
                conversion: Conversion::ImplicitToClass(implicit),
            });
        }

        if let (CqlType::Interval(a), CqlType::Interval(b)) = (invoked, declared) {
            if let Some(child) = self.operand_convert(a, b) {
                candidates.push(OperandMatch {
                    score: ConversionScore(5),
                    precedence: declared.category_precedence(),
                    conversion: Conversion::IntervalCovariant(Box::new(child.conversion)),
                });
            }
        }

        if let (CqlType::List(a), CqlType::List(b)) = (invoked, declared) {
            if let Some(child) = self.operand_convert(a, b) {
                candidates.push(OperandMatch {
                    score: ConversionScore(5),
                    precedence: declared.category_precedence(),
                    conversion: Conversion::ListCovariant(Box::new(child.conversion)),
                });
            }
        }

        candidates.into_iter().min_by_key(|m| m.score.0)
    }

    /// Built-in ("Date -> DateTime" style) plus model-reported subtyping.
    /// List/Interval covariance and Choice membership are excluded here —
    /// they have their own dedicated, differently-scored paths above.
    fn is_direct_subtype(&self, invoked: &CqlType, declared: &CqlType) -> bool {
        match (invoked, declared) {
            (CqlType::List(_), CqlType::List(_)) => false,
            (CqlType::Interval(_), CqlType::Interval(_)) => false,
            (CqlType::Choice(_), _) | (_, CqlType::Choice(_)) => false,
            _ => invoked.is_subtype_of(declared) || self.model.is_sub_type(invoked, declared),
        }
    }

    /// `operand_convert` restricted to the exact-overload-match rule used
    /// by the runtime dispatcher: only score 0 (exact) or 1 (subtype)
    /// qualify.
    pub fn exact_operand_convert(
        &self,
        invoked: &CqlType,
        declared: &CqlType,
    ) -> Option<OperandMatch> {
        self.operand_convert(invoked, declared)
            .filter(|m| m.score.0 <= 1)
    }

    /// `match(invocation, overloads)`: pick the single least-converting
    /// overload. `payload` on each candidate is caller data (e.g. the
    /// pre-built result node) carried through to the winner.
    pub fn match_overload<T: Clone>(
        &self,
        invocation: &[CqlType],
        overloads: &[OverloadCandidate<T>],
    ) -> Result<OverloadMatch<T>, ResolverError> {
        let mut scored: Vec<(usize, u32, u32, Vec<OperandMatch>, Vec<CqlType>)> = Vec::new();

        'overloads: for (idx, overload) in overloads.iter().enumerate() {
            if overload.operand_types.len() != invocation.len() {
                continue;
            }

            let substituted = match self.instantiate_generics(&overload.operand_types, invocation)
            {
                Some(types) => types,
                None => continue 'overloads,
            };

            let mut wrapped = Vec::with_capacity(invocation.len());
            let mut total_score: u32 = 0;
            let mut total_precedence: u32 = 0;
            for (invoked, declared) in invocation.iter().zip(substituted.iter()) {
                match self.operand_convert(invoked, declared) {
                    Some(m) => {
                        total_score += m.score.0;
                        total_precedence += m.precedence as u32;
                        wrapped.push(m);
                    }
                    None => continue 'overloads,
                }
            }
            scored.push((idx, total_score, total_precedence, wrapped, substituted));
        }

        if scored.is_empty() {
            return Err(ResolverError::NoOverloadMatch(overloads.len()));
        }

        let min_score = scored.iter().map(|s| s.1).min().unwrap();
        scored.retain(|s| s.1 == min_score);

        if scored.len() > 1 {
            let min_precedence = scored.iter().map(|s| s.2).min().unwrap();
            scored.retain(|s| s.2 == min_precedence);
        }

        if scored.len() > 1 {
            return Err(ResolverError::Ambiguous(scored.len()));
        }

        let (idx, _, _, wrapped, substituted) = scored.into_iter().next().unwrap();
        Ok(OverloadMatch {
            index: idx,
            payload: overloads[idx].payload.clone(),
            wrapped_operands: wrapped,
            substituted_types: substituted,
        })
    }

    /// Exact-match-only overload resolution used by the runtime
    /// dispatcher: identical to `match_overload` but operand matches are
    /// filtered to score 0/1 paths.
    pub fn match_overload_exact<T: Clone>(
        &self,
        invocation: &[CqlType],
        overloads: &[OverloadCandidate<T>],
    ) -> Result<OverloadMatch<T>, ResolverError> {
        let mut scored: Vec<(usize, u32, u32, Vec<OperandMatch>, Vec<CqlType>)> = Vec::new();

        for (idx, overload) in overloads.iter().enumerate() {
            if overload.operand_types.len() != invocation.len() {
                continue;
            }
            if overload
                .operand_types
                .iter()
                .any(|t| t.is_generic())
            {
                continue; // exact dispatch never instantiates generics
            }

            let mut wrapped = Vec::with_capacity(invocation.len());
            let mut total_score = 0u32;
            let mut total_precedence = 0u32;
            let mut ok = true;
            for (invoked, declared) in invocation.iter().zip(overload.operand_types.iter()) {
                match self.exact_operand_convert(invoked, declared) {
                    Some(m) => {
                        total_score += m.score.0;
                        total_precedence += m.precedence as u32;
                        wrapped.push(m);
                    }
                    None => {
                        ok = false;
                        break;
                    }
                }
            }
            if ok {
                scored.push((
                    idx,
                    total_score,
                    total_precedence,
                    wrapped,
                    overload.operand_types.clone(),
                ));
            }
        }

        if scored.is_empty() {
            return Err(ResolverError::NoOverloadMatch(overloads.len()));
        }
        let min_score = scored.iter().map(|s| s.1).min().unwrap();
        scored.retain(|s| s.1 == min_score);
        if scored.len() > 1 {
            let min_precedence = scored.iter().map(|s| s.2).min().unwrap();
            scored.retain(|s| s.2 == min_precedence);
        }
        if scored.len() > 1 {
            return Err(ResolverError::Ambiguous(scored.len()));
        }
        let (idx, _, _, wrapped, substituted) = scored.into_iter().next().unwrap();
        Ok(OverloadMatch {
            index: idx,
            payload: overloads[idx].payload.clone(),
            wrapped_operands: wrapped,
            substituted_types: substituted,
        })
    }

    /// Substitute the three generic placeholders in `declared_types` with
    /// a concrete type inferred from `invocation` via mixed-type
    /// inference. Returns `None` if a generic overload's placeholders
    /// cannot be instantiated (inference punted to Choice).
    fn instantiate_generics(
        &self,
        declared_types: &[CqlType],
        invocation: &[CqlType],
    ) -> Option<Vec<CqlType>> {
        if !declared_types.iter().any(|t| t.is_generic()) {
            return Some(declared_types.to_vec());
        }

        let inference = MixedTypeInference::new(self);
        let mut bound: Vec<CqlType> = Vec::new();
        for (declared, invoked) in declared_types.iter().zip(invocation.iter()) {
            match declared {
                CqlType::GenericType => bound.push(invoked.clone()),
                CqlType::GenericInterval => match invoked {
                    CqlType::Interval(point) => bound.push((**point).clone()),
                    other => bound.push(other.clone()),
                },
                CqlType::GenericList => match invoked {
                    CqlType::List(elem) => bound.push((**elem).clone()),
                    other => bound.push(other.clone()),
                },
                _ => {}
            }
        }
        if bound.is_empty() {
            return Some(declared_types.to_vec());
        }
        let (inferred, punted) = inference.infer(&bound);
        if punted {
            return None;
        }

        Some(
            declared_types
                .iter()
                .map(|t| match t {
                    CqlType::GenericType => inferred.clone(),
                    CqlType::GenericInterval => CqlType::interval(inferred.clone()),
                    CqlType::GenericList => CqlType::list(inferred.clone()),
                    other => other.clone(),
                })
                .collect(),
        )
    }
}

/// One candidate signature considered by `match_overload`. `payload` is
/// caller data (typically the pre-built ELM result node) returned with
/// the winner.
#[derive(Debug, Clone)]
pub struct OverloadCandidate<T> {
    pub operand_types: Vec<CqlType>,
    pub payload: T,
}

impl<T> OverloadCandidate<T> {
    pub fn new(operand_types: Vec<CqlType>, payload: T) -> Self {
        Self {
            operand_types,
            payload,
        }
    }
}

/// The winning overload: its index among the candidates, the payload it
/// carried, the per-operand conversions needed, and (for generic
/// overloads) the concrete types the placeholders were bound to.
#[derive(Debug, Clone)]
pub struct OverloadMatch<T> {
    pub index: usize,
    pub payload: T,
    pub wrapped_operands: Vec<OperandMatch>,
    pub substituted_types: Vec<CqlType>,
}

/// §4.2.1 Mixed-type inference: given a set of operand types, produce a
/// single least-converting common type.
pub struct MixedTypeInference<'a, 'm> {
    resolver: &'a ConversionResolver<'m>,
}

impl<'a, 'm> MixedTypeInference<'a, 'm> {
    pub fn new(resolver: &'a ConversionResolver<'m>) -> Self {
        Self { resolver }
    }

    /// De-duplicate and flatten nested Choice into a flat alternative
    /// set; if exactly one alternative remains, return it (not punted).
    /// Otherwise return `Choice(alternatives)` with the punted flag set.
    pub fn infer(&self, types: &[CqlType]) -> (CqlType, bool) {
        let mut alts: Vec<CqlType> = Vec::new();
        for t in types {
            flatten_choice(t, &mut alts);
        }
        dedupe_preserving_order(&mut alts);

        if alts.len() == 1 {
            return (alts.into_iter().next().unwrap(), false);
        }

        if let Some(common) = self.least_converting_common(&alts) {
            return (common, false);
        }

        (CqlType::choice(alts), true)
    }

    /// `intersect(a, b)`: intersection of the alternative sets of `a` and
    /// `b` (after flattening), or `None` if empty.
    pub fn intersect(&self, a: &CqlType, b: &CqlType) -> Option<CqlType> {
        let mut alts_a = Vec::new();
        flatten_choice(a, &mut alts_a);
        let mut alts_b = Vec::new();
        flatten_choice(b, &mut alts_b);

        let common: Vec<CqlType> = alts_a
            .into_iter()
            .filter(|t| alts_b.contains(t))
            .collect();

        if common.is_empty() {
            return None;
        }
        if common.len() == 1 {
            return Some(common.into_iter().next().unwrap());
        }
        Some(CqlType::choice(common))
    }

    /// Find a single type every alternative in `alts` converts into,
    /// preferring the one with the lowest total conversion score. This is
    /// how `(Date, DateTime)` infers to `DateTime`: Date converts into
    /// DateTime at some cost, DateTime converts into itself at cost 0.
    fn least_converting_common(&self, alts: &[CqlType]) -> Option<CqlType> {
        let mut best: Option<(CqlType, u32)> = None;
        for candidate in alts {
            let mut total = 0u32;
            let mut all_match = true;
            for alt in alts {
                match self.resolver.operand_convert(alt, candidate) {
                    Some(m) => total += m.score.0,
                    None => {
                        all_match = false;
                        break;
                    }
                }
            }
            if all_match {
                match &best {
                    Some((_, best_score)) if *best_score <= total => {}
                    _ => best = Some((candidate.clone(), total)),
                }
            }
        }
        best.map(|(t, _)| t)
    }
}

fn flatten_choice(t: &CqlType, out: &mut Vec<CqlType>) {
    match t {
        CqlType::Choice(members) => {
            for m in members {
                flatten_choice(m, out);
            }
        }
        other => out.push(other.clone()),
    }
}

fn dedupe_preserving_order(types: &mut Vec<CqlType>) {
    let mut seen: Vec<CqlType> = Vec::new();
    types.retain(|t| {
        if seen.contains(t) {
            false
        } else {
            seen.push(t.clone());
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_info::EmptyModelInfo;

    fn resolver() -> ConversionResolver<'static> {
        static MODEL: EmptyModelInfo = EmptyModelInfo;
        ConversionResolver::new(&MODEL)
    }

    #[test]
    fn exact_match_scores_zero() {
        let r = resolver();
        let m = r.operand_convert(&CqlType::Integer, &CqlType::Integer).unwrap();
        assert_eq!(m.score.0, 0);
        assert_eq!(m.conversion, Conversion::Exact);
    }

    #[test]
    fn numeric_widening_scores_as_subtype() {
        let r = resolver();
        let m = r.operand_convert(&CqlType::Integer, &CqlType::Long).unwrap();
        assert_eq!(m.score.0, 1);
        let m = r.operand_convert(&CqlType::Integer, &CqlType::Decimal).unwrap();
        // Integer -> Decimal is not a direct subtype edge in the lattice...
        // actually it is (is_subtype_of handles Integer/Decimal directly).
        assert_eq!(m.score.0, 1);
    }

    #[test]
    fn any_to_t_scores_two() {
        let r = resolver();
        let m = r.operand_convert(&CqlType::Any, &CqlType::String).unwrap();
        assert_eq!(m.score.0, 2);
        assert_eq!(m.conversion, Conversion::AnyToDeclared);
    }

    #[test]
    fn cast_into_choice_scores_three() {
        let r = resolver();
        let declared = CqlType::choice(vec![CqlType::String, CqlType::Integer]);
        let m = r.operand_convert(&CqlType::Integer, &declared).unwrap();
        assert_eq!(m.score.0, 3);
    }

    #[test]
    fn incompatible_types_do_not_match() {
        let r = resolver();
        assert!(r.operand_convert(&CqlType::String, &CqlType::Boolean).is_none());
    }

    #[test]
    fn list_and_interval_covariance_score_five() {
        let r = resolver();
        let m = r
            .operand_convert(&CqlType::list(CqlType::Integer), &CqlType::list(CqlType::Long))
            .unwrap();
        assert_eq!(m.score.0, 5);
        let m = r
            .operand_convert(
                &CqlType::interval(CqlType::Integer),
                &CqlType::interval(CqlType::Long),
            )
            .unwrap();
        assert_eq!(m.score.0, 5);
    }

    #[test]
    fn scalar_does_not_demote_into_list_or_interval() {
        let r = resolver();
        assert!(r.operand_convert(&CqlType::Integer, &CqlType::list(CqlType::Integer)).is_none());
        assert!(r
            .operand_convert(&CqlType::Integer, &CqlType::interval(CqlType::Integer))
            .is_none());
    }

    // Scenario 1 (spec §8): (Integer, Date) vs the three overloads below
    // matches the third exactly, with no wrapping.
    #[test]
    fn scenario_least_converting_numeric() {
        let r = resolver();
        let overloads = vec![
            OverloadCandidate::new(vec![CqlType::Long, CqlType::DateTime], "long_datetime"),
            OverloadCandidate::new(vec![CqlType::Decimal, CqlType::DateTime], "decimal_datetime"),
            OverloadCandidate::new(vec![CqlType::Integer, CqlType::Date], "integer_date"),
        ];
        let invocation = vec![CqlType::Integer, CqlType::Date];
        let result = r.match_overload(&invocation, &overloads).unwrap();
        assert_eq!(result.payload, "integer_date");
        assert!(result.wrapped_operands.iter().all(|m| m.score.0 == 0));
    }

    // Scenario 2: (String, String) vs (Any, String) twice -> ambiguous.
    #[test]
    fn scenario_ambiguous_any() {
        let r = resolver();
        let overloads = vec![
            OverloadCandidate::new(vec![CqlType::Any, CqlType::String], "a"),
            OverloadCandidate::new(vec![CqlType::Any, CqlType::String], "b"),
        ];
        let invocation = vec![CqlType::String, CqlType::String];
        let err = r.match_overload(&invocation, &overloads).unwrap_err();
        assert!(matches!(err, ResolverError::Ambiguous(2)));
    }

    // Scenario 3: (Date, Interval<DateTime>, List<DateTime>, String) vs
    // (Generic-T, Generic-Interval<T>, Generic-List<T>, String) infers
    // T = DateTime and wraps the first operand.
    #[test]
    fn scenario_generic_with_implicit_conversion() {
        let r = resolver();
        let overloads = vec![OverloadCandidate::new(
            vec![
                CqlType::GenericType,
                CqlType::GenericInterval,
                CqlType::GenericList,
                CqlType::String,
            ],
            "generic_sig",
        )];
        let invocation = vec![
            CqlType::Date,
            CqlType::interval(CqlType::DateTime),
            CqlType::list(CqlType::DateTime),
            CqlType::String,
        ];
        let result = r.match_overload(&invocation, &overloads).unwrap();
        assert_eq!(result.substituted_types[0], CqlType::DateTime);
        assert!(result.wrapped_operands[0].score.0 > 0);
    }

    // Scenario 4: Choice<Interval<DateTime>, Interval<Date>> into
    // Interval<DateTime> -> matched, score 3.
    #[test]
    fn scenario_choice_to_concrete() {
        let r = resolver();
        let invoked = CqlType::choice(vec![
            CqlType::interval(CqlType::DateTime),
            CqlType::interval(CqlType::Date),
        ]);
        let m = r
            .operand_convert(&invoked, &CqlType::interval(CqlType::DateTime))
            .unwrap();
        assert_eq!(m.score.0, 3);
        assert!(matches!(m.conversion, Conversion::ChoiceCastOut(_)));
    }

    #[test]
    fn mixed_type_inference_dedupes_and_flattens() {
        let r = resolver();
        let inference = MixedTypeInference::new(&r);
        let types = vec![
            CqlType::choice(vec![CqlType::String, CqlType::Integer]),
            CqlType::Integer,
        ];
        let (inferred, punted) = inference.infer(&types);
        assert!(punted);
        assert!(matches!(inferred, CqlType::Choice(_)));
    }

    #[test]
    fn mixed_type_inference_singleton_is_not_punted() {
        let r = resolver();
        let inference = MixedTypeInference::new(&r);
        let (inferred, punted) = inference.infer(&[CqlType::Integer, CqlType::Integer]);
        assert!(!punted);
        assert_eq!(inferred, CqlType::Integer);
    }

    #[test]
    fn inference_idempotence() {
        let r = resolver();
        let inference = MixedTypeInference::new(&r);
        let (first, _) = inference.infer(&[CqlType::Integer, CqlType::Long]);
        let (second, _) = inference.infer(&[first.clone()]);
        assert_eq!(first, second);
    }

    #[test]
    fn arity_mismatch_is_not_a_candidate() {
        let r = resolver();
        let overloads = vec![OverloadCandidate::new(vec![CqlType::Integer], "one_arg")];
        let invocation = vec![CqlType::Integer, CqlType::Integer];
        let err = r.match_overload(&invocation, &overloads).unwrap_err();
        assert!(matches!(err, ResolverError::NoOverloadMatch(1)));
    }

    #[test]
    fn exact_overload_match_rejects_widening() {
        let r = resolver();
        let overloads = vec![OverloadCandidate::new(vec![CqlType::Decimal], "decimal_only")];
        let invocation = vec![CqlType::Integer];
        // Integer -> Decimal scores 1 (subtype), so exact dispatch should
        // still accept it (score 0 or 1 both qualify)...
        let ok = r.match_overload_exact(&invocation, &overloads);
        assert!(ok.is_ok());

        let overloads = vec![OverloadCandidate::new(vec![CqlType::String], "string_only")];
        let err = r.match_overload_exact(&invocation, &overloads).unwrap_err();
        assert!(matches!(err, ResolverError::NoOverloadMatch(1)));
    }
}

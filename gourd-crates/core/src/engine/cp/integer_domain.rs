use enumset::EnumSet;

use crate::basic_types::EmptyDomain;
use crate::engine::environment::Environment;
use crate::engine::environment::ReversibleStore;
use crate::engine::environment::StoredInteger;
use crate::engine::notifications::DomainEvent;
use crate::gourd_assert_moderate;

const WORD_SIZE: usize = 64;

/// The representation of a single integer domain.
///
/// Bounds and size live in reversible cells. An enumerated domain additionally keeps one bit
/// per value of its initial range; a value is present when it lies within the bounds and its
/// bit is set. Bits outside the bounds are never consulted, so tightening a bound does not
/// touch the bitset.
#[derive(Debug, Clone)]
pub(crate) struct IntegerDomain {
    lower_bound: StoredInteger,
    upper_bound: StoredInteger,
    size: StoredInteger,
    holes: Option<DomainBits>,
}

#[derive(Debug, Clone)]
struct DomainBits {
    offset: i32,
    words: Vec<StoredInteger>,
}

impl IntegerDomain {
    pub(crate) fn bounded(
        environment: &mut Environment,
        lower_bound: i32,
        upper_bound: i32,
    ) -> Self {
        gourd_assert_moderate!(lower_bound <= upper_bound);

        IntegerDomain {
            lower_bound: environment.grow(lower_bound as i64),
            upper_bound: environment.grow(upper_bound as i64),
            size: environment.grow(upper_bound as i64 - lower_bound as i64 + 1),
            holes: None,
        }
    }

    /// Creates an enumerated domain containing exactly `values`, which must be sorted and free
    /// of duplicates.
    pub(crate) fn enumerated(environment: &mut Environment, values: &[i32]) -> Self {
        gourd_assert_moderate!(!values.is_empty());
        gourd_assert_moderate!(values.windows(2).all(|pair| pair[0] < pair[1]));

        let lower_bound = values[0];
        let upper_bound = values[values.len() - 1];
        let range = bit_index(lower_bound, upper_bound) + 1;

        let mut words = vec![0_u64; range.div_ceil(WORD_SIZE)];
        for &value in values {
            let index = bit_index(lower_bound, value);
            words[index / WORD_SIZE] |= 1 << (index % WORD_SIZE);
        }

        IntegerDomain {
            lower_bound: environment.grow(lower_bound as i64),
            upper_bound: environment.grow(upper_bound as i64),
            size: environment.grow(values.len() as i64),
            holes: Some(DomainBits {
                offset: lower_bound,
                words: words
                    .into_iter()
                    .map(|word| environment.grow(word as i64))
                    .collect(),
            }),
        }
    }

    pub(crate) fn is_enumerated(&self) -> bool {
        self.holes.is_some()
    }

    pub(crate) fn lower_bound(&self, environment: &Environment) -> i32 {
        environment.read(self.lower_bound) as i32
    }

    pub(crate) fn upper_bound(&self, environment: &Environment) -> i32 {
        environment.read(self.upper_bound) as i32
    }

    pub(crate) fn size(&self, environment: &Environment) -> u32 {
        environment.read(self.size) as u32
    }

    pub(crate) fn contains(&self, environment: &Environment, value: i32) -> bool {
        if value < self.lower_bound(environment) || value > self.upper_bound(environment) {
            return false;
        }

        match &self.holes {
            None => true,
            Some(bits) => bits.is_set(environment, bits.index_of(value)),
        }
    }

    pub(crate) fn next_value(&self, environment: &Environment, value: i32) -> Option<i32> {
        let upper_bound = self.upper_bound(environment);
        let start = value.checked_add(1)?.max(self.lower_bound(environment));
        if start > upper_bound {
            return None;
        }

        match &self.holes {
            None => Some(start),
            Some(bits) => bits
                .first_set_bit_from(
                    environment,
                    bits.index_of(start),
                    bits.index_of(upper_bound),
                )
                .map(|index| bits.value_of(index)),
        }
    }

    pub(crate) fn previous_value(&self, environment: &Environment, value: i32) -> Option<i32> {
        let lower_bound = self.lower_bound(environment);
        let end = value.checked_sub(1)?.min(self.upper_bound(environment));
        if end < lower_bound {
            return None;
        }

        match &self.holes {
            None => Some(end),
            Some(bits) => bits
                .last_set_bit_until(environment, bits.index_of(lower_bound), bits.index_of(end))
                .map(|index| bits.value_of(index)),
        }
    }

    /// Raises the lower bound to the smallest present value which is at least `bound`.
    pub(crate) fn tighten_lower_bound(
        &self,
        environment: &mut Environment,
        bound: i32,
    ) -> Result<EnumSet<DomainEvent>, EmptyDomain> {
        let lower_bound = self.lower_bound(environment);
        let upper_bound = self.upper_bound(environment);
        if bound <= lower_bound {
            return Ok(EnumSet::empty());
        }
        if bound > upper_bound {
            return Err(EmptyDomain);
        }

        let (new_lower_bound, removed) = match &self.holes {
            None => (bound, (bound - lower_bound) as i64),
            Some(bits) => {
                let index = bits
                    .first_set_bit_from(
                        environment,
                        bits.index_of(bound),
                        bits.index_of(upper_bound),
                    )
                    .ok_or(EmptyDomain)?;
                let new_lower_bound = bits.value_of(index);
                let removed = bits.count_set_bits(
                    environment,
                    bits.index_of(lower_bound),
                    index - 1,
                );
                (new_lower_bound, removed as i64)
            }
        };

        environment.assign(self.lower_bound, new_lower_bound as i64);
        environment.add_assign(self.size, -removed);

        let mut events = EnumSet::only(DomainEvent::LowerBound);
        if new_lower_bound == upper_bound {
            events |= DomainEvent::Assign;
        }
        Ok(events)
    }

    /// Lowers the upper bound to the largest present value which is at most `bound`.
    pub(crate) fn tighten_upper_bound(
        &self,
        environment: &mut Environment,
        bound: i32,
    ) -> Result<EnumSet<DomainEvent>, EmptyDomain> {
        let lower_bound = self.lower_bound(environment);
        let upper_bound = self.upper_bound(environment);
        if bound >= upper_bound {
            return Ok(EnumSet::empty());
        }
        if bound < lower_bound {
            return Err(EmptyDomain);
        }

        let (new_upper_bound, removed) = match &self.holes {
            None => (bound, (upper_bound - bound) as i64),
            Some(bits) => {
                let index = bits
                    .last_set_bit_until(
                        environment,
                        bits.index_of(lower_bound),
                        bits.index_of(bound),
                    )
                    .ok_or(EmptyDomain)?;
                let new_upper_bound = bits.value_of(index);
                let removed = bits.count_set_bits(
                    environment,
                    index + 1,
                    bits.index_of(upper_bound),
                );
                (new_upper_bound, removed as i64)
            }
        };

        environment.assign(self.upper_bound, new_upper_bound as i64);
        environment.add_assign(self.size, -removed);

        let mut events = EnumSet::only(DomainEvent::UpperBound);
        if new_upper_bound == lower_bound {
            events |= DomainEvent::Assign;
        }
        Ok(events)
    }

    /// Removes every present value in `[from, to]`.
    ///
    /// A bounded domain cannot represent holes; removals strictly between its bounds are
    /// ignored.
    pub(crate) fn remove_interval(
        &self,
        environment: &mut Environment,
        from: i32,
        to: i32,
    ) -> Result<EnumSet<DomainEvent>, EmptyDomain> {
        let lower_bound = self.lower_bound(environment);
        let upper_bound = self.upper_bound(environment);

        let from = from.max(lower_bound);
        let to = to.min(upper_bound);
        if from > to {
            return Ok(EnumSet::empty());
        }

        if from == lower_bound {
            if to == upper_bound {
                return Err(EmptyDomain);
            }
            return self.tighten_lower_bound(environment, to + 1);
        }
        if to == upper_bound {
            return self.tighten_upper_bound(environment, from - 1);
        }

        let Some(bits) = &self.holes else {
            return Ok(EnumSet::empty());
        };

        let start = bits.index_of(from);
        let end = bits.index_of(to);
        let removed = bits.count_set_bits(environment, start, end);
        if removed == 0 {
            return Ok(EnumSet::empty());
        }

        bits.clear_bits(environment, start, end);
        environment.add_assign(self.size, -(removed as i64));

        Ok(EnumSet::only(DomainEvent::Removal))
    }

    /// Reduces the domain to `value`, which has to be present.
    pub(crate) fn instantiate(
        &self,
        environment: &mut Environment,
        value: i32,
    ) -> Result<EnumSet<DomainEvent>, EmptyDomain> {
        if !self.contains(environment, value) {
            return Err(EmptyDomain);
        }

        let lower_bound = self.lower_bound(environment);
        let upper_bound = self.upper_bound(environment);
        if lower_bound == upper_bound {
            return Ok(EnumSet::empty());
        }

        let mut events = EnumSet::only(DomainEvent::Assign);
        if lower_bound < value {
            events |= DomainEvent::LowerBound;
            environment.assign(self.lower_bound, value as i64);
        }
        if value < upper_bound {
            events |= DomainEvent::UpperBound;
            environment.assign(self.upper_bound, value as i64);
        }
        environment.assign(self.size, 1);

        Ok(events)
    }
}

/// The position of `value` in a bitset whose first bit stands for `offset`. Computed in `i64`
/// since a domain may span more than `i32::MAX` values.
fn bit_index(offset: i32, value: i32) -> usize {
    (value as i64 - offset as i64) as usize
}

impl DomainBits {
    fn index_of(&self, value: i32) -> usize {
        bit_index(self.offset, value)
    }

    fn value_of(&self, index: usize) -> i32 {
        (self.offset as i64 + index as i64) as i32
    }

    fn word(&self, environment: &Environment, word_index: usize) -> u64 {
        environment.read(self.words[word_index]) as u64
    }

    fn is_set(&self, environment: &Environment, index: usize) -> bool {
        self.word(environment, index / WORD_SIZE) & (1 << (index % WORD_SIZE)) != 0
    }

    /// The mask selecting the bits of word `word_index` which fall within `[start, end]`.
    fn mask(word_index: usize, start: usize, end: usize) -> u64 {
        let first_bit = word_index * WORD_SIZE;
        let low = start.saturating_sub(first_bit);
        let high = (end - first_bit).min(WORD_SIZE - 1);

        (u64::MAX << low) & (u64::MAX >> (WORD_SIZE - 1 - high))
    }

    fn first_set_bit_from(
        &self,
        environment: &Environment,
        start: usize,
        end: usize,
    ) -> Option<usize> {
        let mut word_index = start / WORD_SIZE;
        let mut mask = u64::MAX << (start % WORD_SIZE);

        while word_index * WORD_SIZE <= end {
            let word = self.word(environment, word_index) & mask;
            if word != 0 {
                let index = word_index * WORD_SIZE + word.trailing_zeros() as usize;
                return (index <= end).then_some(index);
            }

            word_index += 1;
            mask = u64::MAX;
        }

        None
    }

    fn last_set_bit_until(
        &self,
        environment: &Environment,
        start: usize,
        end: usize,
    ) -> Option<usize> {
        let mut word_index = end / WORD_SIZE;
        let mut mask = u64::MAX >> (WORD_SIZE - 1 - end % WORD_SIZE);

        loop {
            let word = self.word(environment, word_index) & mask;
            if word != 0 {
                let index =
                    word_index * WORD_SIZE + (WORD_SIZE - 1) - word.leading_zeros() as usize;
                return (index >= start).then_some(index);
            }

            if word_index * WORD_SIZE <= start {
                return None;
            }

            word_index -= 1;
            mask = u64::MAX;
        }
    }

    fn count_set_bits(&self, environment: &Environment, start: usize, end: usize) -> u32 {
        if start > end {
            return 0;
        }

        (start / WORD_SIZE..=end / WORD_SIZE)
            .map(|word_index| {
                (self.word(environment, word_index) & Self::mask(word_index, start, end))
                    .count_ones()
            })
            .sum()
    }

    fn clear_bits(&self, environment: &mut Environment, start: usize, end: usize) {
        for word_index in start / WORD_SIZE..=end / WORD_SIZE {
            let word = self.word(environment, word_index);
            let cleared = word & !Self::mask(word_index, start, end);

            if cleared != word {
                environment.assign(self.words[word_index], cleared as i64);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(domain: &IntegerDomain, environment: &Environment) -> Vec<i32> {
        let mut values = vec![domain.lower_bound(environment)];
        while let Some(next) = domain.next_value(environment, values[values.len() - 1]) {
            values.push(next);
        }
        values
    }

    #[test]
    fn bit_index_spans_the_full_value_range() {
        assert_eq!(bit_index(-5, 3), 8);
        assert_eq!(bit_index(i32::MIN, i32::MAX), u32::MAX as usize);
        assert_eq!(bit_index(-1, i32::MAX), 1_usize << 31);
    }

    #[test]
    fn bounded_domain_ignores_interior_removals() {
        let mut environment = Environment::default();
        let domain = IntegerDomain::bounded(&mut environment, 0, 10);

        let events = domain.remove_interval(&mut environment, 3, 5).unwrap();

        assert!(events.is_empty());
        assert_eq!(domain.size(&environment), 11);
        assert!(domain.contains(&environment, 4));
    }

    #[test]
    fn enumerated_domain_skips_holes_when_tightening_bounds() {
        let mut environment = Environment::default();
        let domain = IntegerDomain::enumerated(&mut environment, &[1, 2, 3, 4, 5, 6, 7]);

        let _ = domain.remove_interval(&mut environment, 2, 4).unwrap();
        let events = domain.tighten_lower_bound(&mut environment, 2).unwrap();

        assert_eq!(events, EnumSet::only(DomainEvent::LowerBound));
        assert_eq!(domain.lower_bound(&environment), 5);
        assert_eq!(domain.size(&environment), 3);
    }

    #[test]
    fn removal_spanning_several_words_is_counted_exactly() {
        let mut environment = Environment::default();
        let all = (0..200).collect::<Vec<_>>();
        let domain = IntegerDomain::enumerated(&mut environment, &all);

        let _ = domain.remove_interval(&mut environment, 60, 130).unwrap();

        assert_eq!(domain.size(&environment), 200 - 71);
        assert_eq!(domain.next_value(&environment, 59), Some(131));
        assert_eq!(domain.previous_value(&environment, 131), Some(59));
    }

    #[test]
    fn sparse_domain_iterates_in_order() {
        let mut environment = Environment::default();
        let domain = IntegerDomain::enumerated(&mut environment, &[-3, 0, 7, 64, 65]);

        assert_eq!(values(&domain, &environment), vec![-3, 0, 7, 64, 65]);
        assert_eq!(domain.previous_value(&environment, 64), Some(7));
        assert_eq!(domain.next_value(&environment, 65), None);
        assert_eq!(domain.previous_value(&environment, -3), None);
    }

    #[test]
    fn tightening_past_the_last_present_value_fails() {
        let mut environment = Environment::default();
        let domain = IntegerDomain::enumerated(&mut environment, &[1, 5, 9]);

        let _ = domain.remove_interval(&mut environment, 9, 9).unwrap();

        assert_eq!(domain.upper_bound(&environment), 5);
        assert_eq!(domain.tighten_lower_bound(&mut environment, 6), Err(EmptyDomain));
        assert_eq!(domain.upper_bound(&environment), 5);
    }

    #[test]
    fn instantiation_reports_the_bound_events() {
        let mut environment = Environment::default();
        let domain = IntegerDomain::bounded(&mut environment, 0, 4);

        let events = domain.instantiate(&mut environment, 0).unwrap();

        assert_eq!(events, DomainEvent::Assign | DomainEvent::UpperBound);
        assert_eq!(domain.size(&environment), 1);
        assert!(domain.instantiate(&mut environment, 0).unwrap().is_empty());
        assert_eq!(domain.instantiate(&mut environment, 1), Err(EmptyDomain));
    }

    #[test]
    fn removing_the_whole_domain_fails() {
        let mut environment = Environment::default();
        let domain = IntegerDomain::bounded(&mut environment, 2, 4);

        assert_eq!(domain.remove_interval(&mut environment, 0, 10), Err(EmptyDomain));
        assert_eq!(domain.size(&environment), 3);
    }
}

use crate::basic_types::PropagationStatusCP;
use crate::basic_types::PropagatorConflict;
use crate::engine::variables::IntegerVariable;
use crate::propagation::DomainEvents;
use crate::propagation::Entailment;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::PropagationContextMut;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The [`PropagatorConstructor`] for the [`BinaryNotEqualsPropagator`].
#[derive(Clone, Debug)]
pub(crate) struct BinaryNotEqualsArgs<AVar, BVar> {
    pub(crate) a: AVar,
    pub(crate) b: BVar,
}

impl<AVar, BVar> PropagatorConstructor for BinaryNotEqualsArgs<AVar, BVar>
where
    AVar: IntegerVariable + 'static,
    BVar: IntegerVariable + 'static,
{
    type PropagatorImpl = BinaryNotEqualsPropagator<AVar, BVar>;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let BinaryNotEqualsArgs { a, b } = self;

        // Nothing can be removed until one of the two is assigned.
        context.register(a.clone(), DomainEvents::ASSIGN, LocalId::from(0));
        context.register(b.clone(), DomainEvents::ASSIGN, LocalId::from(1));

        BinaryNotEqualsPropagator { a, b }
    }
}

/// Propagator for the constraint `a != b`, removing the value of an assigned variable from the
/// other one.
#[derive(Clone, Debug)]
pub(crate) struct BinaryNotEqualsPropagator<AVar, BVar> {
    a: AVar,
    b: BVar,
}

impl<AVar, BVar> Propagator for BinaryNotEqualsPropagator<AVar, BVar>
where
    AVar: IntegerVariable + 'static,
    BVar: IntegerVariable + 'static,
{
    fn name(&self) -> &str {
        "BinaryNotEq"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContextMut) -> PropagationStatusCP {
        let a = context.fixed_value(&self.a);
        let b = context.fixed_value(&self.b);

        match (a, b) {
            (Some(a), Some(b)) if a == b => {
                return Err(PropagatorConflict {
                    propagator: "BinaryNotEq",
                    message: "both variables are assigned the same value",
                }
                .into());
            }
            (Some(_), Some(_)) => {}
            (Some(a), None) => {
                let _ = context.remove(&self.b, a)?;
            }
            (None, Some(b)) => {
                let _ = context.remove(&self.a, b)?;
            }
            (None, None) => return Ok(()),
        }

        // The other variable no longer contains the assigned value.
        context.set_passive();
        Ok(())
    }

    fn is_entailed(&self, context: PropagationContext) -> Entailment {
        let a_lb = context.lower_bound(&self.a);
        let a_ub = context.upper_bound(&self.a);
        let b_lb = context.lower_bound(&self.b);
        let b_ub = context.upper_bound(&self.b);

        if a_ub < b_lb || b_ub < a_lb {
            return Entailment::Entailed;
        }

        match (context.fixed_value(&self.a), context.fixed_value(&self.b)) {
            (Some(a), Some(b)) if a == b => Entailment::Disentailed,
            (Some(a), _) if !context.contains(&self.b, a) => Entailment::Entailed,
            (_, Some(b)) if !context.contains(&self.a, b) => Entailment::Entailed,
            _ => Entailment::Undecided,
        }
    }
}

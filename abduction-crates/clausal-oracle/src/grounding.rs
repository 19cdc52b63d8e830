//! Instantiation of the rules of a knowledge base over its individuals.
use std::rc::Rc;
use std::sync::Arc;

use abduction_core::Axiom;
use abduction_core::OracleError;
use abduction_format::Literal;
use abduction_format::Rule;
use abduction_format::Term;
use fnv::FnvHashMap;

type Binding<'a> = FnvHashMap<&'a str, Arc<str>>;

/// Converts a ground literal of a knowledge-base file to an [`Axiom`].
pub fn ground_axiom(literal: &Literal) -> Result<Axiom, OracleError> {
    instantiate(literal, &Binding::default())
}

/// Returns every instantiation of `rule` as a clause `¬body ∨ head`, where every variable ranges
/// over `individuals`.
///
/// Instantiations which contain both an axiom and its complement are always satisfied and are
/// left out.
pub(crate) fn ground_rule(
    rule: &Rule,
    individuals: &[Arc<str>],
) -> Result<Vec<Vec<Axiom>>, OracleError> {
    let mut variables: Vec<&str> = Vec::new();
    for term in rule.body.iter().chain(rule.head.iter()).flat_map(|l| &l.terms) {
        if let Term::Variable(name) = term {
            if !variables.contains(&&**name) {
                variables.push(&**name);
            }
        }
    }

    let mut clauses = Vec::new();
    let mut binding = Binding::default();
    ground_variables(rule, &variables, individuals, &mut binding, &mut clauses)?;

    Ok(clauses)
}

fn ground_variables<'a>(
    rule: &Rule,
    variables: &[&'a str],
    individuals: &[Arc<str>],
    binding: &mut Binding<'a>,
    clauses: &mut Vec<Vec<Axiom>>,
) -> Result<(), OracleError> {
    let Some((variable, remaining)) = variables.split_first() else {
        let clause = instantiate_rule(rule, binding)?;
        if !is_tautology(&clause) {
            clauses.push(clause);
        }
        return Ok(());
    };

    for individual in individuals {
        let _ = binding.insert(*variable, Arc::clone(individual));
        ground_variables(rule, remaining, individuals, binding, clauses)?;
    }
    let _ = binding.remove(variable);

    Ok(())
}

fn instantiate_rule(rule: &Rule, binding: &Binding<'_>) -> Result<Vec<Axiom>, OracleError> {
    let mut clause = Vec::with_capacity(rule.body.len() + rule.head.len());

    for literal in &rule.body {
        clause.push(instantiate(literal, binding)?.complement());
    }
    for literal in &rule.head {
        clause.push(instantiate(literal, binding)?);
    }

    clause.sort();
    clause.dedup();
    Ok(clause)
}

fn instantiate(literal: &Literal, binding: &Binding<'_>) -> Result<Axiom, OracleError> {
    let arguments = literal
        .terms
        .iter()
        .map(|term| match term {
            Term::Individual(name) => Ok(to_arc(name)),
            Term::Variable(name) => binding
                .get(&**name)
                .cloned()
                .ok_or_else(|| OracleError::UnsupportedAxiom(literal.to_string())),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Axiom::new(&*literal.predicate, arguments, literal.negated))
}

fn is_tautology(clause: &[Axiom]) -> bool {
    clause
        .iter()
        .any(|axiom| clause.iter().any(|other| axiom.clashes_with(other)))
}

pub(crate) fn to_arc(name: &Rc<str>) -> Arc<str> {
    Arc::from(&**name)
}

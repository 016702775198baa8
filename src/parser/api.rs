use pest::error::{Error, ErrorVariant};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use super::ast::{Param, Signature};

#[derive(Parser)]
#[grammar = "parser/signature_grammar.pest"] // relative to src
pub struct SignatureParser;

impl SignatureParser {
    /// Parses a signature string like `"number, number"` or `"...number | string"`.
    pub fn parse_signature(source: &str) -> Result<Signature, Error<Rule>> {
        let mut pairs = SignatureParser::parse(Rule::signature, source)?;
        let signature_pair = match pairs.next() {
            Some(p) => p,
            None => {
                return Err(Error::new_from_pos(
                    ErrorVariant::CustomError {
                        message: "Empty parse result".to_string(),
                    },
                    pest::Position::from_start(source),
                ))
            }
        };
        build_signature(signature_pair)
    }
}

fn build_signature(pair: Pair<Rule>) -> Result<Signature, Error<Rule>> {
    let mut params: Vec<Param> = vec![];
    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::param => {
                if params.last().map(|p| p.rest).unwrap_or(false) {
                    let message = "Rest parameter must be the last parameter".to_string();
                    return Err(Error::new_from_span(
                        ErrorVariant::CustomError { message },
                        inner_pair.as_span(),
                    ));
                }
                params.push(build_param(inner_pair)?);
            }
            Rule::EOI => { /* Do nothing */ }
            _ => return Err(get_unexpected_error(1, &inner_pair)),
        }
    }
    Ok(Signature::new(params))
}

fn build_param(pair: Pair<Rule>) -> Result<Param, Error<Rule>> {
    let mut rest = false;
    let mut types = vec![];
    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::rest_marker => rest = true,
            Rule::type_union => {
                for type_pair in inner_pair.into_inner() {
                    match type_pair.as_rule() {
                        Rule::type_name => types.push(type_pair.as_str().to_string()),
                        _ => return Err(get_unexpected_error(3, &type_pair)),
                    }
                }
            }
            _ => return Err(get_unexpected_error(2, &inner_pair)),
        }
    }
    Ok(Param::new(types, rest))
}

fn get_unexpected_error(id: i32, pair: &Pair<Rule>) -> Error<Rule> {
    let message = format!("Unexpected state reached [{:?}] - {}", pair.as_rule(), id);
    Error::new_from_span(ErrorVariant::CustomError { message }, pair.as_span())
}

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use std::collections::BTreeSet;
use syn::parse::{Parse, ParseStream, Result};
use syn::{parse_macro_input, Ident, Token};

#[derive(Clone, Copy)]
enum BinaryOp {
    And,
    Or,
    Xor,
}

impl BinaryOp {
    fn method(self) -> Ident {
        match self {
            BinaryOp::And => format_ident!("and"),
            BinaryOp::Or => format_ident!("or"),
            BinaryOp::Xor => format_ident!("xor"),
        }
    }
}

/// AST for boolean formulas
enum Formula {
    Name(String),
    Embedded(syn::Expr),
    Group(Box<Formula>),
    Not(Box<Formula>),
    Binary(BinaryOp, Box<Formula>, Box<Formula>),
}

impl Formula {
    /// Record every name by polarity; negation of a group does not reach its names
    fn collect(&self, negated: bool, plain: &mut BTreeSet<String>, inverted: &mut BTreeSet<String>) {
        match self {
            Formula::Name(name) => {
                if negated {
                    inverted.insert(name.clone());
                } else {
                    plain.insert(name.clone());
                }
            }
            Formula::Embedded(_) => {}
            Formula::Group(inner) => inner.collect(negated, plain, inverted),
            Formula::Not(inner) => inner.collect(!negated, plain, inverted),
            Formula::Binary(_, left, right) => {
                left.collect(false, plain, inverted);
                right.collect(false, plain, inverted);
            }
        }
    }
}

/// Code generation context
struct Codegen {
    /// Names used both plain and negated
    mixed: BTreeSet<String>,
}

impl Codegen {
    fn negated_name(&self, name: &str) -> TokenStream2 {
        quote! {
            ::logic_algebra::Expression::new().and([#name]).negate()
        }
    }

    /// Tokens evaluating to an `Operand`
    fn operand(&self, formula: &Formula, negated: bool) -> TokenStream2 {
        match formula {
            Formula::Not(inner) => self.operand(inner, !negated),
            Formula::Group(inner) => self.operand(inner, negated),
            Formula::Name(name) if negated && self.mixed.contains(name) => {
                let nested = self.negated_name(name);
                quote! { ::logic_algebra::Operand::from(#nested) }
            }
            // negated names are inverted on the root expression
            Formula::Name(name) => quote! { ::logic_algebra::Operand::from(#name) },
            Formula::Embedded(expr) if !negated => quote! { ::logic_algebra::Operand::from(#expr) },
            Formula::Embedded(_) | Formula::Binary(..) => {
                let nested = self.expression(formula, negated);
                quote! { ::logic_algebra::Operand::from(#nested) }
            }
        }
    }

    /// Tokens evaluating to an `Expression`
    fn expression(&self, formula: &Formula, negated: bool) -> TokenStream2 {
        let (body, negate) = match formula {
            Formula::Not(inner) => return self.expression(inner, !negated),
            Formula::Group(inner) => return self.expression(inner, negated),
            Formula::Name(name) if negated && self.mixed.contains(name) => {
                return self.negated_name(name);
            }
            Formula::Name(name) => {
                return quote! { ::logic_algebra::Expression::new().and([#name]) };
            }
            Formula::Embedded(expr) => (
                quote! {
                    ::logic_algebra::Expression::new().and([::logic_algebra::Operand::from(#expr)])
                },
                negated,
            ),
            Formula::Binary(op, left, right) => {
                let method = op.method();
                let left = self.operand(left, false);
                let right = self.operand(right, false);
                (
                    quote! { ::logic_algebra::Expression::new().#method([#left, #right]) },
                    negated,
                )
            }
        };
        if negate {
            quote! { #body.negate() }
        } else {
            body
        }
    }
}

/// Parser for boolean formulas, left to right without precedence
struct FormulaParser {
    formula: Formula,
}

impl Parse for FormulaParser {
    fn parse(input: ParseStream) -> Result<Self> {
        let formula = parse_chain(input)?;
        if !input.is_empty() {
            return Err(input.error("expected a binary operator"));
        }
        Ok(FormulaParser { formula })
    }
}

fn parse_operator(input: ParseStream) -> Result<Option<BinaryOp>> {
    let op = if input.peek(Token![&&]) {
        input.parse::<Token![&&]>()?;
        BinaryOp::And
    } else if input.peek(Token![||]) {
        input.parse::<Token![||]>()?;
        BinaryOp::Or
    } else if input.peek(Token![*]) {
        input.parse::<Token![*]>()?;
        BinaryOp::And
    } else if input.peek(Token![&]) {
        input.parse::<Token![&]>()?;
        BinaryOp::And
    } else if input.peek(Token![+]) {
        input.parse::<Token![+]>()?;
        BinaryOp::Or
    } else if input.peek(Token![|]) {
        input.parse::<Token![|]>()?;
        BinaryOp::Or
    } else if input.peek(Token![^]) {
        input.parse::<Token![^]>()?;
        BinaryOp::Xor
    } else {
        return Ok(None);
    };
    Ok(Some(op))
}

/// Parse a chain of binary operations, folding to the left
fn parse_chain(input: ParseStream) -> Result<Formula> {
    let mut left = parse_unary(input)?;
    while let Some(op) = parse_operator(input)? {
        let right = parse_unary(input)?;
        left = Formula::Binary(op, Box::new(left), Box::new(right));
    }
    Ok(left)
}

/// Parse negations (`!` or `~`) and atoms
fn parse_unary(input: ParseStream) -> Result<Formula> {
    if input.peek(Token![!]) {
        input.parse::<Token![!]>()?;
        Ok(Formula::Not(Box::new(parse_unary(input)?)))
    } else if input.peek(Token![~]) {
        input.parse::<Token![~]>()?;
        Ok(Formula::Not(Box::new(parse_unary(input)?)))
    } else {
        parse_atom(input)
    }
}

/// Parse names, string literals, embedded `{ expr }` blocks and parenthesised groups
fn parse_atom(input: ParseStream) -> Result<Formula> {
    if input.peek(syn::token::Paren) {
        let content;
        syn::parenthesized!(content in input);
        let inner = parse_chain(&content)?;
        if !content.is_empty() {
            return Err(content.error("expected a binary operator"));
        }
        Ok(Formula::Group(Box::new(inner)))
    } else if input.peek(syn::token::Brace) {
        let content;
        syn::braced!(content in input);
        Ok(Formula::Embedded(content.parse()?))
    } else if input.peek(syn::LitStr) {
        let lit: syn::LitStr = input.parse()?;
        Ok(Formula::Name(lit.value()))
    } else {
        let ident: Ident = input.parse()?;
        Ok(Formula::Name(ident.to_string()))
    }
}

/// Build an `Expression` from a boolean formula at compile time
///
/// The formula reads like the runtime parser accepts it: binary operators
/// associate left to right with no precedence between them, and parentheses
/// group.
///
/// # Supported Syntax
///
/// - `a` or `"a"` - an input named `a`
/// - `{ expr }` - any value convertible into an `Operand`, embedded as a nested expression
/// - `!a` or `~a` - negation; a negated name becomes an inverted input
/// - `a * b`, `a & b` or `a && b` - AND
/// - `a + b`, `a | b` or `a || b` - OR
/// - `a ^ b` - XOR
/// - `(a + b) * c` - grouping
///
/// A name used both plain and negated in the same formula keeps a single,
/// non-inverted input; its negated uses become negated nested expressions.
///
/// # Examples
///
/// ```ignore
/// use logic_algebra::{and, formula};
///
/// let majority = formula!((a & b) | (a & c) | (b & c));
/// let select = formula!(!s & a | s & b);
///
/// let carry = and(["a", "b"]);
/// let sum = formula!({ carry } ^ c);
/// ```
#[proc_macro]
pub fn formula(input: TokenStream) -> TokenStream {
    let parser = parse_macro_input!(input as FormulaParser);

    let mut plain = BTreeSet::new();
    let mut negated = BTreeSet::new();
    parser.formula.collect(false, &mut plain, &mut negated);
    let mixed: BTreeSet<String> = plain.intersection(&negated).cloned().collect();
    let inverted: Vec<String> = negated.difference(&mixed).cloned().collect();

    let codegen = Codegen { mixed };
    let body = codegen.expression(&parser.formula, false);

    let tokens = if inverted.is_empty() {
        body
    } else {
        quote! {
            {
                let mut expression = #body;
                #(expression.set_inverted(#inverted, true);)*
                expression
            }
        }
    };
    TokenStream::from(tokens)
}

//! Arithmetic request handler.
//!
//! # Validation order
//! 1. token
//! 2. both operands numeric
//! 3. operation name, checked only at dispatch
//! 4. zero divisor, checked only for `divide`
//!
//! The first failure wins. An unknown operation paired with a non-numeric
//! operand reports the operand.

use crate::ajax::number::{format_float, parse_numeric};
use crate::ajax::response::AjaxResponse;
use crate::ajax::{param, AjaxContext, AjaxParams};
use crate::security::TokenVerifier;
use log::{info, warn};
use serde::Serialize;

/// Per-call request built from caller key-value input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CalculationRequest {
    pub token: String,
    pub operand1: String,
    pub operand2: String,
    /// Raw operation name; validated at dispatch.
    pub operation: String,
}

impl CalculationRequest {
    /// Reads `nonce`, `number1`, `number2` and `operation`.
    ///
    /// Missing keys read as empty strings; text fields are sanitized, the
    /// token is taken verbatim.
    pub fn from_params(params: &AjaxParams) -> Self {
        Self {
            token: params.get("nonce").cloned().unwrap_or_default(),
            operand1: param(params, "number1"),
            operand2: param(params, "number2"),
            operation: param(params, "operation"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "add" => Some(Self::Add),
            "subtract" => Some(Self::Subtract),
            "multiply" => Some(Self::Multiply),
            "divide" => Some(Self::Divide),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
        }
    }
}

/// Successful computation.
///
/// A non-finite `value` serializes as `"result": null`; the summary still
/// spells it out (`INF`, `NAN`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calculation {
    #[serde(rename = "result")]
    pub value: f64,
    /// `"<op1> <operation> <op2> = <value>"`.
    #[serde(rename = "calculation")]
    pub summary: String,
}

/// Closed set of rejection reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculationFailure {
    InvalidToken,
    InvalidOperand,
    InvalidOperation,
    DivideByZero,
}

impl CalculationFailure {
    /// User-facing message; part of the response contract.
    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidToken => "Security check failed.",
            Self::InvalidOperand => "Invalid numbers provided.",
            Self::InvalidOperation => "Invalid operation specified.",
            Self::DivideByZero => "Division by zero is not allowed.",
        }
    }

    fn code(self) -> &'static str {
        match self {
            Self::InvalidToken => "invalid_token",
            Self::InvalidOperand => "invalid_operand",
            Self::InvalidOperation => "invalid_operation",
            Self::DivideByZero => "divide_by_zero",
        }
    }
}

pub type CalculationResult = Result<Calculation, CalculationFailure>;

/// Validates and evaluates one calculation request.
pub fn handle(request: &CalculationRequest, verifier: &dyn TokenVerifier) -> CalculationResult {
    let outcome = evaluate(request, verifier);
    match &outcome {
        Ok(_) => info!(
            "event=ajax_calculate module=ajax status=ok operation={}",
            Operation::parse(&request.operation).map_or("unknown", Operation::as_str)
        ),
        Err(failure) => warn!(
            "event=ajax_calculate module=ajax status=error error_code={}",
            failure.code()
        ),
    }
    outcome
}

fn evaluate(request: &CalculationRequest, verifier: &dyn TokenVerifier) -> CalculationResult {
    if !verifier.verify(&request.token) {
        return Err(CalculationFailure::InvalidToken);
    }

    let (Some(lhs), Some(rhs)) = (
        parse_numeric(&request.operand1),
        parse_numeric(&request.operand2),
    ) else {
        return Err(CalculationFailure::InvalidOperand);
    };

    let value = match Operation::parse(&request.operation) {
        Some(Operation::Add) => lhs + rhs,
        Some(Operation::Subtract) => lhs - rhs,
        Some(Operation::Multiply) => lhs * rhs,
        Some(Operation::Divide) => {
            if rhs == 0.0 {
                return Err(CalculationFailure::DivideByZero);
            }
            lhs / rhs
        }
        None => return Err(CalculationFailure::InvalidOperation),
    };

    Ok(Calculation {
        value,
        summary: format!(
            "{} {} {} = {}",
            format_float(lhs),
            request.operation,
            format_float(rhs),
            format_float(value)
        ),
    })
}

/// Ajax entry point for the calculator action.
pub fn calculate_action(ctx: &AjaxContext<'_>, params: &AjaxParams) -> AjaxResponse {
    match handle(&CalculationRequest::from_params(params), ctx.verifier) {
        Ok(calculation) => AjaxResponse::success(calculation),
        Err(failure) => AjaxResponse::error(failure.message()),
    }
}

use crate::{RegistryError, RegistryResult};

/// A host request, decoded from a function name and its string arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    InitLedger,
    RegisterPassenger {
        id: String,
        name: String,
        email: String,
    },
    BuyTicket {
        seat_number: String,
        passenger_id: String,
    },
    ReadTicket {
        seat_number: String,
    },
    ReadPassenger {
        id: String,
    },
}

impl Invocation {
    pub fn parse(function: &str, args: &[String]) -> RegistryResult<Self> {
        let invocation = match function {
            "InitLedger" => {
                expect_arity(function, args, 0)?;
                Invocation::InitLedger
            }
            "RegisterPassenger" => {
                expect_arity(function, args, 3)?;
                Invocation::RegisterPassenger {
                    id: args[0].clone(),
                    name: args[1].clone(),
                    email: args[2].clone(),
                }
            }
            "BuyTicket" => {
                expect_arity(function, args, 2)?;
                Invocation::BuyTicket {
                    seat_number: args[0].clone(),
                    passenger_id: args[1].clone(),
                }
            }
            "ReadTicket" => {
                expect_arity(function, args, 1)?;
                Invocation::ReadTicket { seat_number: args[0].clone() }
            }
            "ReadPassenger" => {
                expect_arity(function, args, 1)?;
                Invocation::ReadPassenger { id: args[0].clone() }
            }
            other => return Err(RegistryError::UnknownFunction(other.to_string())),
        };
        Ok(invocation)
    }

    pub fn function_name(&self) -> &'static str {
        match self {
            Invocation::InitLedger => "InitLedger",
            Invocation::RegisterPassenger { .. } => "RegisterPassenger",
            Invocation::BuyTicket { .. } => "BuyTicket",
            Invocation::ReadTicket { .. } => "ReadTicket",
            Invocation::ReadPassenger { .. } => "ReadPassenger",
        }
    }

    /// Queries never write and need no commit
    pub fn is_read_only(&self) -> bool {
        matches!(self, Invocation::ReadTicket { .. } | Invocation::ReadPassenger { .. })
    }
}

fn expect_arity(function: &str, args: &[String], expected: usize) -> RegistryResult<()> {
    if args.len() != expected {
        return Err(RegistryError::InvalidArgument(format!(
            "{} takes {} argument(s), got {}",
            function,
            expected,
            args.len()
        )));
    }
    Ok(())
}

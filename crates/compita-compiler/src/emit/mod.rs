//! Code generation for the target machine.
//!
//! The [`CodeGenerator`] turns a diagnostic-free, fully resolved program
//! into one flat instruction sequence:
//!
//! ```text
//! PUSH <t>0 ...          global data, declaration order
//! PUSH <int>entry ...    one address slot per function, program order
//! CALL slot(main)
//! HALT
//! body(f1) body(f2) ...
//! ```
//!
//! Calls go through the slots, so a body can be emitted before any entry
//! address is known. Bodies are emitted first, then entry addresses are
//! laid out from their lengths.
//!
//! Every expression routine leaves exactly one value on the stack.
//!
//! # Example
//!
//! ```ignore
//! let code = CodeGenerator::generate(ctx)?;
//! print!("{}", compita_core::instr::serialize(&code));
//! ```

mod expr;
mod frame;
mod jumps;
mod stmt;

use compita_core::ast::{Function, IdentExpr, Identifier};
use compita_core::instr::BinaryOpcode;
use compita_core::{CodegenError, Immediate, Instruction, MemoryAddress, Register, WordType};
use rustc_hash::FxHashMap;

use crate::context::CompilationContext;
use crate::symbols::{ScopeId, Symbol};
use frame::{Allocator, Frame, parameter_address};

/// An emitted instruction sequence.
pub(crate) type Code = Vec<Instruction>;

// ============================================================================
// Program layout
// ============================================================================

/// Lays out global storage and function slots, then emits every function.
pub struct CodeGenerator<'a, 'ast> {
    ctx: CompilationContext<'a, 'ast>,
    /// Reservation of global data
    data: Code,
    globals: Frame,
    /// Function name to the cell holding its entry address
    slots: FxHashMap<&'ast str, MemoryAddress>,
}

impl<'a, 'ast> CodeGenerator<'a, 'ast> {
    /// Allocate globals and function slots.
    pub fn new(ctx: CompilationContext<'a, 'ast>) -> Result<Self, CodegenError> {
        let mut allocator = Allocator::globals(ctx.options.base());
        let mut globals = Frame::default();
        let mut data = Vec::new();
        for decl in ctx.program.declarations {
            globals.declare(&mut allocator, decl.identifier, &mut data)?;
        }
        let data_cells = allocator.used();

        let mut slots = FxHashMap::default();
        for function in ctx.program.functions {
            slots.insert(function.name(), allocator.allocate(1));
        }
        log::debug!(
            "layout: {} global cell(s), {} function slot(s)",
            data_cells,
            slots.len()
        );

        Ok(Self {
            ctx,
            data,
            globals,
            slots,
        })
    }

    /// Generate the whole program.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn generate(ctx: CompilationContext<'a, 'ast>) -> Result<Vec<Instruction>, CodegenError> {
        Self::new(ctx)?.emit()
    }

    fn emit(self) -> Result<Vec<Instruction>, CodegenError> {
        let main = self.ctx.program.main().ok_or(CodegenError::MissingMain)?;
        let main_slot = self.slot_of(main)?;

        let bodies = self
            .ctx
            .program
            .functions
            .iter()
            .map(|&function| self.function(function)?.emit())
            .collect::<Result<Vec<Code>, _>>()?;

        let functions = self.ctx.program.functions;
        let mut entry = self.data.len() + functions.len() + 2;
        let mut code = self.data;
        for (function, body) in functions.iter().zip(&bodies) {
            log::debug!(
                "function '{}' at {} ({} instruction(s))",
                function.name(),
                entry,
                body.len()
            );
            code.push(Instruction::push(Immediate::int(entry as i64)));
            entry += body.len();
        }
        code.push(Instruction::Call { slot: main_slot });
        code.push(Instruction::Halt);
        code.extend(bodies.into_iter().flatten());

        log::debug!("generated {} instruction(s)", code.len());
        Ok(code)
    }

    fn slot_of(&self, function: Function<'ast>) -> Result<MemoryAddress, CodegenError> {
        self.slots
            .get(function.name())
            .copied()
            .ok_or_else(|| CodegenError::UnresolvedName {
                name: function.name().to_string(),
            })
    }

    /// Emitter for one function, with its frame laid out.
    pub(crate) fn function(
        &self,
        function: Function<'ast>,
    ) -> Result<FunctionEmitter<'_, 'a, 'ast>, CodegenError> {
        let mut frame = Frame::default();
        let parameters = function.parameters();
        for (index, parameter) in parameters.iter().enumerate() {
            frame.bind(parameter.id, parameter_address(index, parameters.len()));
        }

        let mut allocator = Allocator::locals();
        let mut locals = Vec::new();
        for decl in function.declarations() {
            frame.declare(&mut allocator, decl.identifier, &mut locals)?;
        }

        Ok(FunctionEmitter {
            generator: self,
            function,
            scope: self.ctx.scope_of(function),
            frame,
            locals,
        })
    }
}

// ============================================================================
// Function emission
// ============================================================================

/// Emits the body of one function.
///
/// Expression and statement routines live in `expr` and `stmt`; each
/// returns a fresh sequence so enclosing constructs can measure it before
/// emitting their jumps.
pub(crate) struct FunctionEmitter<'g, 'a, 'ast> {
    generator: &'g CodeGenerator<'a, 'ast>,
    function: Function<'ast>,
    scope: ScopeId,
    frame: Frame,
    /// Reservation of the locals
    locals: Code,
}

impl<'g, 'a, 'ast> FunctionEmitter<'g, 'a, 'ast> {
    /// Prologue, locals, body, then the implicit return.
    pub fn emit(&self) -> Result<Code, CodegenError> {
        let mut code = vec![
            Instruction::push(Register::Ebp),
            Instruction::mov(Register::Esp, Register::Ebp),
        ];
        code.extend(self.locals.iter().copied());
        code.extend(self.block(self.function.body())?);
        code.extend(self.return_sequence(None)?);
        log::trace!("'{}': {} instruction(s)", self.function.name(), code.len());
        Ok(code)
    }

    /// Declaration and address of a referenced variable.
    fn variable(
        &self,
        expr: &IdentExpr<'ast>,
    ) -> Result<(&'ast Identifier<'ast>, MemoryAddress), CodegenError> {
        match self.generator.ctx.resolve(self.scope, expr.name) {
            Some(Symbol::Variable(ident)) => {
                let address = self
                    .frame
                    .get(ident.id)
                    .or_else(|| self.generator.globals.get(ident.id))
                    .ok_or_else(|| CodegenError::UnresolvedName {
                        name: expr.name.to_string(),
                    })?;
                Ok((ident, address))
            }
            Some(Symbol::Function(_)) => Err(CodegenError::WrongSymbolKind {
                name: expr.name.to_string(),
                expected: "variable",
            }),
            None => Err(CodegenError::UnresolvedName {
                name: expr.name.to_string(),
            }),
        }
    }

    /// Address slot of a called name.
    fn callee_slot(&self, name: &str) -> Result<MemoryAddress, CodegenError> {
        match self.generator.ctx.resolve(self.scope, name) {
            Some(Symbol::Function(function)) => self.generator.slot_of(function),
            Some(Symbol::Variable(_)) => Err(CodegenError::WrongSymbolKind {
                name: name.to_string(),
                expected: "function",
            }),
            None => Err(CodegenError::UnresolvedName {
                name: name.to_string(),
            }),
        }
    }

    /// Push the absolute address of a (possibly subscripted) variable.
    ///
    /// The offset is accumulated row-major: each subscript is added, then
    /// the running offset is scaled by the next dimension's extent.
    fn address(&self, expr: &IdentExpr<'ast>) -> Result<Code, CodegenError> {
        let (ident, base) = self.variable(expr)?;
        let top = MemoryAddress::stack_top();

        let mut code = vec![Instruction::push(Immediate::int(0))];
        for (index, &subscript) in expr.subscripts.iter().enumerate() {
            let next = ident.dimensions.get(index + 1).copied().unwrap_or(1);
            code.extend(self.expr(subscript)?);
            code.push(Instruction::pop(Register::R1));
            code.push(Instruction::binary(BinaryOpcode::Add, top, Register::R1, top));
            code.push(Instruction::binary(BinaryOpcode::Mult, top, Immediate::int(next), top));
        }
        code.push(match base {
            MemoryAddress::Relative { base, displacement } => Instruction::binary(
                BinaryOpcode::Add,
                base,
                Immediate::int(displacement),
                Register::R1,
            ),
            MemoryAddress::Absolute(absolute) => {
                Instruction::mov(Immediate::int(absolute), Register::R1)
            }
        });
        code.push(Instruction::binary(BinaryOpcode::Add, top, Register::R1, top));
        Ok(code)
    }

    /// Word type the return value is cast to; `void` returns an int.
    fn return_word(&self) -> WordType {
        self.function.return_type().word().unwrap_or(WordType::Int)
    }
}

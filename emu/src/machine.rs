use arch::{Opcode, Program, SymbolTable, Word};

use crate::config::{Config, MIN_REGISTERS};
use crate::debugger::{Resume, Session};
use crate::device::Device;
use crate::error::{Fault, LoadError};
use crate::stack::Stack;

/// Result of executing a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Halt,
    /// `brk` was executed.
    Break,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Halted,
    /// The debugger user quit, or its input closed.
    Exited,
    Faulted(Fault),
}

/// Registers saved by `jsr` and restored by `ret`.
const SAVED: std::ops::RangeInclusive<Word> = 5..=9;

pub struct Machine<D: Device> {
    pub(crate) memory: Vec<Word>,
    pub(crate) registers: Vec<Word>,
    pub(crate) compare: Word,
    pub(crate) stack: Stack,
    pub(crate) pc: Word,
    pub(crate) device: D,
    pub(crate) symbols: SymbolTable,
    pub(crate) session: Option<Session>,
}

fn to_char(val: Word) -> char {
    u32::try_from(val)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

// Construction and loading
impl<D: Device> Machine<D> {
    pub fn new(config: &Config, device: D) -> Self {
        Machine {
            memory: vec![0; config.memory],
            registers: vec![0; config.registers.max(MIN_REGISTERS)],
            compare: 0,
            stack: Stack::new(config.stack),
            pc: 0,
            device,
            symbols: SymbolTable::new(),
            session: None,
        }
    }

    /// Clear memory, registers, compare, stack and any debug session.
    pub fn reset(&mut self) {
        self.memory.fill(0);
        self.registers.fill(0);
        self.compare = 0;
        self.stack.clear();
        self.pc = 0;
        self.symbols.clear();
        self.session = None;
    }

    pub fn load(&mut self, program: &Program) -> Result<(), LoadError> {
        self.reset();
        let size = program.words.len();
        if size >= self.memory.len() {
            return Err(LoadError::TooLarge(size, self.memory.len()));
        }
        self.memory[..size].copy_from_slice(&program.words);
        self.pc = program.entry;
        log::debug!("loaded {} words, entry {}", size, program.entry);
        Ok(())
    }

    /// Enable the debugger for the next run. Call after `load`.
    pub fn debug(&mut self, symbols: SymbolTable) -> &mut Session {
        self.symbols = symbols;
        self.session.insert(Session::default())
    }
}

// Inspection
impl<D: Device> Machine<D> {
    pub fn pc(&self) -> Word {
        self.pc
    }

    pub fn compare(&self) -> Word {
        self.compare
    }

    pub fn memory(&self) -> &[Word] {
        &self.memory
    }

    pub fn registers(&self) -> &[Word] {
        &self.registers
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }
}

// Memory and register access
impl<D: Device> Machine<D> {
    fn slot(len: usize, n: Word) -> Option<usize> {
        usize::try_from(n).ok().filter(|&i| i < len)
    }

    pub fn get(&self, addr: Word) -> Result<Word, Fault> {
        let i = Self::slot(self.memory.len(), addr).ok_or(Fault::Memory(addr))?;
        Ok(self.memory[i])
    }

    pub fn set(&mut self, addr: Word, val: Word) -> Result<(), Fault> {
        let i = Self::slot(self.memory.len(), addr).ok_or(Fault::Memory(addr))?;
        self.memory[i] = val;
        Ok(())
    }

    pub fn reg(&self, r: Word) -> Result<Word, Fault> {
        let i = Self::slot(self.registers.len(), r).ok_or(Fault::Register(r))?;
        Ok(self.registers[i])
    }

    pub fn set_reg(&mut self, r: Word, val: Word) -> Result<(), Fault> {
        let i = Self::slot(self.registers.len(), r).ok_or(Fault::Register(r))?;
        self.registers[i] = val;
        Ok(())
    }

    /// Word at pc, advancing pc.
    fn next(&mut self) -> Result<Word, Fault> {
        let word = self.get(self.pc)?;
        self.pc = self.pc.wrapping_add(1);
        Ok(word)
    }

    fn next_reg(&mut self) -> Result<Word, Fault> {
        let r = self.next()?;
        self.reg(r)
    }

    fn next_mem(&mut self) -> Result<Word, Fault> {
        let addr = self.next()?;
        self.get(addr)
    }

    fn next_ind(&mut self) -> Result<Word, Fault> {
        let r = self.next()?;
        self.get(self.reg(r)?)
    }

    fn put_reg(&mut self, val: Word) -> Result<(), Fault> {
        let r = self.next()?;
        self.set_reg(r, val)
    }

    fn put_mem(&mut self, val: Word) -> Result<(), Fault> {
        let addr = self.next()?;
        self.set(addr, val)
    }

    fn put_ind(&mut self, val: Word) -> Result<(), Fault> {
        let r = self.next()?;
        self.set(self.reg(r)?, val)
    }
}

// Execution
impl<D: Device> Machine<D> {
    /// `r := op(r, src)` on the register named by the next word.
    fn arith(&mut self, src: Word, op: fn(Word, Word) -> Word) -> Result<Word, Fault> {
        let r = self.next()?;
        let val = op(self.reg(r)?, src);
        self.set_reg(r, val)?;
        Ok(val)
    }

    fn divide(&mut self, src: Word) -> Result<(), Fault> {
        let r = self.next()?;
        let dividend = self.reg(r)?;
        if src == 0 {
            return Err(Fault::DivideByZero);
        }
        self.set_reg(r, dividend.wrapping_div(src))
    }

    fn compare_with(&mut self, src: Word) -> Result<(), Fault> {
        self.compare = self.next_reg()?.wrapping_sub(src);
        Ok(())
    }

    fn jump_if(&mut self, cond: bool) -> Result<(), Fault> {
        let target = self.next()?;
        if cond {
            self.pc = target;
        }
        Ok(())
    }

    fn write_range(&mut self, start: Word, count: Word) -> Result<(), Fault> {
        for i in 0..count {
            let c = to_char(self.get(start.wrapping_add(i))?);
            self.device.write_char(c);
        }
        Ok(())
    }

    /// Execute the instruction at pc.
    pub fn step(&mut self) -> Result<Step, Fault> {
        let at = self.pc;
        let code = self.next()?;
        let op = Opcode::from_word(code).ok_or(Fault::InvalidCommand(code))?;
        log::trace!("[{:0>4}] {}", at, op);

        use Opcode::*;
        match op {
            HALT => return Ok(Step::Halt),
            CLRR => self.put_reg(0)?,
            CLRX => self.put_ind(0)?,
            CLRM => self.put_mem(0)?,
            CLRB => {
                let start = self.next_reg()?;
                let count = self.next_reg()?;
                for i in 0..count {
                    self.set(start.wrapping_add(i), 0)?;
                }
            }
            MOVIR | MOVAR => {
                let val = self.next()?;
                self.put_reg(val)?
            }
            MOVRR => {
                let val = self.next_reg()?;
                self.put_reg(val)?
            }
            MOVRM => {
                let val = self.next_reg()?;
                self.put_mem(val)?
            }
            MOVMR => {
                let val = self.next_mem()?;
                self.put_reg(val)?
            }
            MOVXR => {
                let val = self.next_ind()?;
                self.put_reg(val)?
            }
            MOVRX => {
                let val = self.next_reg()?;
                self.put_ind(val)?
            }
            MOVXX => {
                let val = self.next_ind()?;
                self.put_ind(val)?
            }
            MOVB => {
                let start = self.next_reg()?;
                let dest = self.next_reg()?;
                let count = self.next_reg()?;
                for i in 0..count {
                    let val = self.get(start.wrapping_add(i))?;
                    self.set(dest.wrapping_add(i), val)?;
                }
            }

            ADDIR | SUBIR | MULIR | DIVIR => {
                let src = self.next()?;
                self.calc(op, src)?
            }
            ADDRR | SUBRR | MULRR | DIVRR => {
                let src = self.next_reg()?;
                self.calc(op, src)?
            }
            ADDMR | SUBMR | MULMR | DIVMR => {
                let src = self.next_mem()?;
                self.calc(op, src)?
            }
            ADDXR | SUBXR | MULXR | DIVXR => {
                let src = self.next_ind()?;
                self.calc(op, src)?
            }

            JMP => self.pc = self.next()?,
            SOJZ => {
                let val = self.arith(1, Word::wrapping_sub)?;
                self.jump_if(val == 0)?
            }
            SOJNZ => {
                let val = self.arith(1, Word::wrapping_sub)?;
                self.jump_if(val != 0)?
            }
            AOJZ => {
                let val = self.arith(1, Word::wrapping_add)?;
                self.jump_if(val == 0)?
            }
            AOJNZ => {
                let val = self.arith(1, Word::wrapping_add)?;
                self.jump_if(val != 0)?
            }
            CMPIR => {
                let src = self.next()?;
                self.compare_with(src)?
            }
            CMPRR => {
                let src = self.next_reg()?;
                self.compare_with(src)?
            }
            CMPMR => {
                let src = self.next_mem()?;
                self.compare_with(src)?
            }
            JMPN => self.jump_if(self.compare < 0)?,
            JMPZ => self.jump_if(self.compare == 0)?,
            JMPP => self.jump_if(self.compare > 0)?,
            JMPNE => self.jump_if(self.compare != 0)?,

            JSR => {
                let target = self.next()?;
                self.stack.push(self.pc);
                for r in SAVED {
                    let val = self.reg(r)?;
                    self.stack.push(val);
                }
                self.pc = target;
            }
            RET => {
                for r in SAVED.rev() {
                    let val = self.stack.pop();
                    self.set_reg(r, val)?;
                }
                self.pc = self.stack.pop();
            }
            PUSH => {
                let val = self.next_reg()?;
                self.stack.push(val)
            }
            POP => {
                let val = self.stack.pop();
                self.put_reg(val)?
            }
            STACKC => {
                let status = self.stack.status().into();
                self.put_reg(status)?
            }

            OUTCI => {
                let c = to_char(self.next()?);
                self.device.write_char(c)
            }
            OUTCR => {
                let c = to_char(self.next_reg()?);
                self.device.write_char(c)
            }
            OUTCX => {
                let c = to_char(self.next_ind()?);
                self.device.write_char(c)
            }
            OUTCB => {
                let start = self.next_reg()?;
                let count = self.next_reg()?;
                self.write_range(start, count)?
            }
            OUTS => {
                let start = self.next()?;
                let count = self.get(start)?;
                self.write_range(start.wrapping_add(1), count)?
            }
            PRINTI => {
                let val = self.next_reg()?;
                self.device.write_text(&val.to_string())
            }
            READI => {
                let line = self.device.read_line();
                match line.and_then(|l| l.trim().parse::<Word>().ok()) {
                    Some(val) => {
                        self.put_reg(val)?;
                        self.put_reg(0)?
                    }
                    None => {
                        self.pc = self.pc.wrapping_add(1);
                        self.put_reg(1)?
                    }
                }
            }
            READC => {
                let c = self.device.read_char().map_or(-1, |c| c as Word);
                self.put_reg(c)?
            }
            READLN => {
                let line = self.device.read_line().unwrap_or_default();
                let start = self.next()?;
                let mut len: Word = 0;
                for c in line.chars() {
                    self.set(start.wrapping_add(len), c as Word)?;
                    len += 1;
                }
                self.put_reg(len)?
            }

            BRK => return Ok(Step::Break),
            NOP => {}
        }
        Ok(Step::Continue)
    }

    fn calc(&mut self, op: Opcode, src: Word) -> Result<(), Fault> {
        use Opcode::*;
        match op {
            ADDIR | ADDRR | ADDMR | ADDXR => self.arith(src, Word::wrapping_add).map(drop),
            SUBIR | SUBRR | SUBMR | SUBXR => self.arith(src, Word::wrapping_sub).map(drop),
            MULIR | MULRR | MULMR | MULXR => self.arith(src, Word::wrapping_mul).map(drop),
            _ => self.divide(src),
        }
    }

    /// Run until halt, fault or debugger exit. A fault is also reported on
    /// the device.
    pub fn run(&mut self) -> Outcome {
        let outcome = self.run_inner();
        match &outcome {
            Outcome::Halted => log::info!("halted at {}", self.pc.wrapping_sub(1)),
            Outcome::Exited => log::info!("debugger exited at {}", self.pc),
            Outcome::Faulted(fault) => {
                log::error!("fault at {}: {}", self.pc, fault);
                self.device.write_text(&format!("Error: {}\n", fault));
            }
        }
        outcome
    }

    fn run_inner(&mut self) -> Outcome {
        // A debug run pauses before its first instruction. The instruction a
        // pause resumes at is not checked for a breakpoint again.
        let mut pause = self.session.is_some();
        let mut stepping = false;
        loop {
            if pause || self.at_breakpoint() {
                match self.prompt() {
                    Resume::Go => stepping = false,
                    Resume::Step => stepping = true,
                    Resume::Exit => return Outcome::Exited,
                }
            }
            let snapshot = self.watch_snapshot();
            pause = match self.step() {
                Ok(Step::Continue) => {
                    stepping || snapshot.is_some_and(|s| self.watch_changed(&s))
                }
                Ok(Step::Break) => self.session.is_some(),
                Ok(Step::Halt) => return Outcome::Halted,
                Err(fault) => return Outcome::Faulted(fault),
            };
        }
    }
}

//! Testing utilities and mock implementations
//!
//! Mocks for exercising the driver on the host without a LAN865x or a real
//! protocol engine.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec;
use std::vec::Vec;

use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::spi::{self, Operation, SpiDevice};

use crate::diag::Diagnostic;
use crate::driver::config::RegsConfig;
use crate::engine::{Engine, EngineError, EngineHost, RegsEvent};
use crate::error::{HwError, HwResult, IoError, IoResult};
use crate::hal::{Clock, HardwareAdapter, Transfer};
use crate::upper::UpperLayer;

// =============================================================================
// Mock Engine
// =============================================================================

/// One callback the mock engine makes into the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    NeedService,
    Slice(u16, Vec<u8>),
    Packet(bool, u16),
    Event(RegsEvent),
    Error(EngineError),
    /// SPI transaction with tag and outbound bytes
    Spi(u8, Vec<u8>),
    TxDone,
}

/// Scripted protocol engine
///
/// Each `service` call pops one script from the queue and plays its actions
/// against the host. The script is popped before any callback runs, so the
/// callbacks may reenter the engine freely.
///
/// # Example
///
/// ```ignore
/// let engine = MockEngine::new();
/// engine.script(vec![Action::Slice(0, frame.clone()), Action::Packet(true, 60)]);
/// ```
#[derive(Debug)]
pub struct MockEngine {
    context: Cell<Option<usize>>,
    init_ok: Cell<bool>,
    configure_ok: Cell<bool>,
    /// Service calls needed before init reports done; `None` never finishes
    init_done_after: Cell<Option<usize>>,
    send_ok: Cell<bool>,
    plca_ok: Cell<bool>,

    scripts: RefCell<VecDeque<Vec<Action>>>,
    timer_scripts: RefCell<VecDeque<Vec<Action>>>,
    drained: RefCell<VecDeque<bool>>,

    regs: RefCell<Option<RegsConfig>>,
    service_calls: RefCell<Vec<bool>>,
    sent: RefCell<Vec<Vec<u8>>>,
    sent_tsc: RefCell<Vec<u8>>,
    plca_calls: RefCell<Vec<(bool, u8, u8)>>,
    reinits: Cell<usize>,
    timer_calls: Cell<usize>,
    spi_accepted: RefCell<Vec<bool>>,
    spi_rx: RefCell<Vec<Vec<u8>>>,
    spi_done: RefCell<Vec<(u8, bool)>>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self {
            context: Cell::new(None),
            init_ok: Cell::new(true),
            configure_ok: Cell::new(true),
            init_done_after: Cell::new(Some(0)),
            send_ok: Cell::new(true),
            plca_ok: Cell::new(true),
            scripts: RefCell::new(VecDeque::new()),
            timer_scripts: RefCell::new(VecDeque::new()),
            drained: RefCell::new(VecDeque::new()),
            regs: RefCell::new(None),
            service_calls: RefCell::new(Vec::new()),
            sent: RefCell::new(Vec::new()),
            sent_tsc: RefCell::new(Vec::new()),
            plca_calls: RefCell::new(Vec::new()),
            reinits: Cell::new(0),
            timer_calls: Cell::new(0),
            spi_accepted: RefCell::new(Vec::new()),
            spi_rx: RefCell::new(Vec::new()),
            spi_done: RefCell::new(Vec::new()),
        }
    }
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // --- behaviour ---

    pub fn set_init_ok(&self, ok: bool) {
        self.init_ok.set(ok);
    }

    pub fn set_configure_ok(&self, ok: bool) {
        self.configure_ok.set(ok);
    }

    pub fn set_init_done_after(&self, services: Option<usize>) {
        self.init_done_after.set(services);
    }

    pub fn set_send_ok(&self, ok: bool) {
        self.send_ok.set(ok);
    }

    pub fn set_plca_ok(&self, ok: bool) {
        self.plca_ok.set(ok);
    }

    /// Override the context passed to callbacks
    pub fn set_context(&self, context: usize) {
        self.context.set(Some(context));
    }

    /// Queue callbacks for the next `service` call
    pub fn script(&self, actions: Vec<Action>) {
        self.scripts.borrow_mut().push_back(actions);
    }

    /// Queue callbacks for the next `check_timers` call
    pub fn script_timers(&self, actions: Vec<Action>) {
        self.timer_scripts.borrow_mut().push_back(actions);
    }

    /// Queue the drained result of the next `service` call (default `true`)
    pub fn report_drained(&self, drained: bool) {
        self.drained.borrow_mut().push_back(drained);
    }

    // --- inspection ---

    pub fn context(&self) -> Option<usize> {
        self.context.get()
    }

    pub fn regs(&self) -> Option<RegsConfig> {
        *self.regs.borrow()
    }

    /// `blocking` flag of every service call so far
    pub fn service_calls(&self) -> Vec<bool> {
        self.service_calls.borrow().clone()
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.borrow().clone()
    }

    pub fn sent_tsc(&self) -> Vec<u8> {
        self.sent_tsc.borrow().clone()
    }

    pub fn plca_calls(&self) -> Vec<(bool, u8, u8)> {
        self.plca_calls.borrow().clone()
    }

    pub fn reinits(&self) -> usize {
        self.reinits.get()
    }

    pub fn timer_calls(&self) -> usize {
        self.timer_calls.get()
    }

    /// Return value of every SPI transaction callback
    pub fn spi_accepted(&self) -> Vec<bool> {
        self.spi_accepted.borrow().clone()
    }

    /// Receive buffer of every SPI transaction after the callback returned
    pub fn spi_rx(&self) -> Vec<Vec<u8>> {
        self.spi_rx.borrow().clone()
    }

    pub fn spi_done(&self) -> Vec<(u8, bool)> {
        self.spi_done.borrow().clone()
    }

    fn play(&self, host: &dyn EngineHost, actions: Vec<Action>) {
        let context = self.context.get().unwrap_or(usize::MAX);
        for action in actions {
            match action {
                Action::NeedService => host.need_service(context),
                Action::Slice(offset, data) => host.rx_slice(context, offset, &data),
                Action::Packet(success, len) => host.rx_packet(context, success, len),
                Action::Event(event) => host.regs_event(context, event),
                Action::Error(error) => host.error(context, error),
                Action::Spi(tag, tx) => {
                    let mut rx = vec![0u8; tx.len()];
                    let accepted = host.spi_transaction(context, tag, &tx, &mut rx);
                    self.spi_accepted.borrow_mut().push(accepted);
                    self.spi_rx.borrow_mut().push(rx);
                }
                Action::TxDone => host.raw_tx_done(context),
            }
        }
    }
}

impl Engine for MockEngine {
    fn init(&self, context: usize) -> bool {
        if !self.init_ok.get() {
            return false;
        }
        self.context.set(Some(context));
        true
    }

    fn configure(&self, _context: usize, regs: &RegsConfig) -> bool {
        *self.regs.borrow_mut() = Some(*regs);
        self.configure_ok.get()
    }

    fn init_done(&self) -> bool {
        match self.init_done_after.get() {
            Some(services) => self.service_calls.borrow().len() >= services,
            None => false,
        }
    }

    fn service(&self, host: &dyn EngineHost, blocking: bool) -> bool {
        self.service_calls.borrow_mut().push(blocking);
        let actions = self.scripts.borrow_mut().pop_front().unwrap_or_default();
        self.play(host, actions);
        self.drained.borrow_mut().pop_front().unwrap_or(true)
    }

    fn send_raw(&self, frame: &[u8], tsc: u8) -> bool {
        if !self.send_ok.get() {
            return false;
        }
        self.sent.borrow_mut().push(frame.to_vec());
        self.sent_tsc.borrow_mut().push(tsc);
        true
    }

    fn set_plca(&self, enable: bool, node_id: u8, node_count: u8) -> bool {
        self.plca_calls.borrow_mut().push((enable, node_id, node_count));
        self.plca_ok.get()
    }

    fn reinit(&self) {
        self.reinits.set(self.reinits.get() + 1);
    }

    fn check_timers(&self, host: &dyn EngineHost) {
        self.timer_calls.set(self.timer_calls.get() + 1);
        let actions = self.timer_scripts.borrow_mut().pop_front().unwrap_or_default();
        self.play(host, actions);
    }

    fn spi_buffer_done(&self, tag: u8, success: bool) {
        self.spi_done.borrow_mut().push((tag, success));
    }
}

// =============================================================================
// Mock Hardware
// =============================================================================

/// How [`MockHardware`] answers an exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeMode {
    /// Finish before returning with the given outcome
    Complete(bool),
    /// Fill `rx` but defer the outcome
    Pending,
    /// Refuse the exchange
    Refuse,
}

#[derive(Debug)]
pub struct MockHardware {
    irq: Cell<bool>,
    mode: Cell<ExchangeMode>,
    fill: Cell<u8>,
    reset_ok: Cell<bool>,
    resets: Cell<usize>,
    irq_samples: Cell<usize>,
    exchanges: RefCell<Vec<Vec<u8>>>,
}

impl Default for MockHardware {
    fn default() -> Self {
        Self {
            irq: Cell::new(false),
            mode: Cell::new(ExchangeMode::Complete(true)),
            fill: Cell::new(0xA5),
            reset_ok: Cell::new(true),
            resets: Cell::new(0),
            irq_samples: Cell::new(0),
            exchanges: RefCell::new(Vec::new()),
        }
    }
}

impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_irq(&self, active: bool) {
        self.irq.set(active);
    }

    pub fn set_mode(&self, mode: ExchangeMode) {
        self.mode.set(mode);
    }

    /// Byte written into every receive buffer
    pub fn fill_byte(&self) -> u8 {
        self.fill.get()
    }

    pub fn set_reset_ok(&self, ok: bool) {
        self.reset_ok.set(ok);
    }

    pub fn resets(&self) -> usize {
        self.resets.get()
    }

    pub fn irq_samples(&self) -> usize {
        self.irq_samples.get()
    }

    pub fn exchanges(&self) -> Vec<Vec<u8>> {
        self.exchanges.borrow().clone()
    }
}

impl HardwareAdapter for &MockHardware {
    fn reset(&mut self) -> HwResult<()> {
        self.resets.set(self.resets.get() + 1);
        if self.reset_ok.get() {
            Ok(())
        } else {
            Err(HwError::Reset)
        }
    }

    fn is_interrupt_active(&mut self) -> bool {
        self.irq_samples.set(self.irq_samples.get() + 1);
        self.irq.get()
    }

    fn exchange(&mut self, tx: &[u8], rx: &mut [u8]) -> HwResult<Transfer> {
        let mode = self.mode.get();
        if mode == ExchangeMode::Refuse {
            return Err(HwError::Transfer);
        }
        self.exchanges.borrow_mut().push(tx.to_vec());
        rx.fill(self.fill.get());
        Ok(match mode {
            ExchangeMode::Complete(true) => Transfer::Done(Ok(())),
            ExchangeMode::Complete(false) => Transfer::Done(Err(HwError::Transfer)),
            _ => Transfer::Pending,
        })
    }
}

// =============================================================================
// Mock Upper Layer
// =============================================================================

#[derive(Debug, Default)]
pub struct MockUpper {
    delivered: RefCell<Vec<Vec<u8>>>,
    outbound: RefCell<VecDeque<Vec<u8>>>,
    polls: Cell<usize>,
    refuse: Cell<bool>,
    fail_polls: Cell<bool>,
}

impl MockUpper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame handed out on a later poll
    pub fn queue_frame(&self, frame: &[u8]) {
        self.outbound.borrow_mut().push_back(frame.to_vec());
    }

    pub fn refuse_delivery(&self, refuse: bool) {
        self.refuse.set(refuse);
    }

    pub fn fail_polls(&self, fail: bool) {
        self.fail_polls.set(fail);
    }

    pub fn delivered(&self) -> Vec<Vec<u8>> {
        self.delivered.borrow().clone()
    }

    pub fn poll_count(&self) -> usize {
        self.polls.get()
    }

    pub fn pending(&self) -> usize {
        self.outbound.borrow().len()
    }
}

impl UpperLayer for &MockUpper {
    fn deliver_frame(&mut self, frame: &[u8]) -> IoResult<()> {
        if self.refuse.get() {
            return Err(IoError::UpperLayer);
        }
        self.delivered.borrow_mut().push(frame.to_vec());
        Ok(())
    }

    fn next_frame(&mut self, buf: &mut [u8]) -> IoResult<usize> {
        self.polls.set(self.polls.get() + 1);
        if self.fail_polls.get() {
            return Err(IoError::UpperLayer);
        }
        match self.outbound.borrow_mut().pop_front() {
            Some(frame) => {
                let len = frame.len().min(buf.len());
                buf[..len].copy_from_slice(&frame[..len]);
                Ok(len)
            }
            None => Ok(0),
        }
    }
}

// =============================================================================
// Mock Clock
// =============================================================================

/// Clock that advances by a fixed step on every read
///
/// Clones share the same time.
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Rc<Cell<u32>>,
    step: u32,
}

impl MockClock {
    pub fn new(start: u32, step: u32) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
            step,
        }
    }

    pub fn peek(&self) -> u32 {
        self.now.get()
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u32 {
        let now = self.now.get();
        self.now.set(now.wrapping_add(self.step));
        now
    }
}

// =============================================================================
// Diagnostic Recorder
// =============================================================================

std::thread_local! {
    static RECORDED: RefCell<Vec<Diagnostic>> = const { RefCell::new(Vec::new()) };
}

/// Collects diagnostics sent to [`DiagnosticRecorder::sink`] on this thread
pub struct DiagnosticRecorder(());

impl DiagnosticRecorder {
    /// Start recording with an empty log
    pub fn install() -> Self {
        RECORDED.with(|r| r.borrow_mut().clear());
        Self(())
    }

    /// Sink to install with `DriverConfig::with_diagnostics`
    pub fn sink(diagnostic: &Diagnostic) {
        RECORDED.with(|r| r.borrow_mut().push(*diagnostic));
    }

    /// Drain the log
    pub fn take(&self) -> Vec<Diagnostic> {
        RECORDED.with(|r| core::mem::take(&mut *r.borrow_mut()))
    }
}

// =============================================================================
// embedded-hal Doubles
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinLevel {
    Low,
    High,
}

/// Input/output pin that records every level it is driven to
#[derive(Debug)]
pub struct MockPin {
    level: Cell<PinLevel>,
    history: RefCell<Vec<PinLevel>>,
    fail: Cell<bool>,
}

impl MockPin {
    pub fn new(level: PinLevel) -> Self {
        Self {
            level: Cell::new(level),
            history: RefCell::new(Vec::new()),
            fail: Cell::new(false),
        }
    }

    pub fn level(&self) -> PinLevel {
        self.level.get()
    }

    pub fn history(&self) -> Vec<PinLevel> {
        self.history.borrow().clone()
    }

    /// Make the next pin operation fail
    pub fn fail_next(&self) {
        self.fail.set(true);
    }

    fn check(&self) -> Result<(), digital::ErrorKind> {
        if self.fail.replace(false) {
            Err(digital::ErrorKind::Other)
        } else {
            Ok(())
        }
    }

    fn drive(&mut self, level: PinLevel) -> Result<(), digital::ErrorKind> {
        self.check()?;
        self.level.set(level);
        self.history.borrow_mut().push(level);
        Ok(())
    }
}

impl digital::ErrorType for MockPin {
    type Error = digital::ErrorKind;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(PinLevel::Low)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(PinLevel::High)
    }
}

impl InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.check()?;
        Ok(self.level.get() == PinLevel::High)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.check()?;
        Ok(self.level.get() == PinLevel::Low)
    }
}

/// SPI device that answers every byte with a fixed value
#[derive(Debug)]
pub struct MockSpi {
    fill: u8,
    written: Vec<u8>,
    fail: bool,
}

impl MockSpi {
    pub fn new(fill: u8) -> Self {
        Self {
            fill,
            written: Vec::new(),
            fail: false,
        }
    }

    pub fn written(&self) -> Vec<u8> {
        self.written.clone()
    }

    /// Make the next transaction fail
    pub fn fail_next(&mut self) {
        self.fail = true;
    }
}

impl spi::ErrorType for MockSpi {
    type Error = spi::ErrorKind;
}

impl SpiDevice for MockSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        if core::mem::take(&mut self.fail) {
            return Err(spi::ErrorKind::Other);
        }
        for op in operations.iter_mut() {
            match op {
                Operation::Read(buf) => buf.fill(self.fill),
                Operation::Write(data) => self.written.extend_from_slice(data),
                Operation::Transfer(read, write) => {
                    self.written.extend_from_slice(write);
                    read.fill(self.fill);
                }
                Operation::TransferInPlace(buf) => {
                    self.written.extend_from_slice(buf);
                    buf.fill(self.fill);
                }
                Operation::DelayNs(_) => {}
            }
        }
        Ok(())
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay for testing without actual timing
///
/// Records delays for verification without actually waiting.
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Total nanoseconds delayed
    total_ns: RefCell<u64>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        *self.total_ns.borrow()
    }

    /// Get total milliseconds that were "delayed"
    pub fn total_ms(&self) -> u64 {
        self.total_ns() / 1_000_000
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += ns as u64;
    }
}

//! Ready-made machines and the transition-authoring helpers used to express
//! them. The catalog currently holds the grade-school binary multiplier.

use crate::builder::TuringMachineBuilder;
use crate::machine::TuringMachine;
use crate::types::{Pattern, Shift, SingleTapeTransition, Symbol, TuringMachineError};

/// Tape index the multiplier machines leave their result on.
pub const OUTPUT_TAPE: usize = 1;

/// A tape paired with the direction its head moves across a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapeDirection {
    pub index: usize,
    pub shift: Shift,
}

impl TapeDirection {
    pub fn new(index: usize, shift: Shift) -> Self {
        Self { index, shift }
    }
}

/// Loops `state` onto itself while `tape` reads a binary digit, shifting the
/// head in the given direction. The word's terminating blank is left for the
/// caller's exit transition.
pub fn move_across_word(builder: &mut TuringMachineBuilder, state: usize, tape: TapeDirection) {
    builder.add_transition(
        state,
        state,
        &[(tape.index, Pattern::from([Symbol::Zero, Symbol::One]))],
        &[],
        &[(tape.index, tape.shift)],
    );
}

/// Copies the word under `from`'s head onto every tape in `to`, one digit per
/// step, until a blank is read.
///
/// A copy has to write whichever digit it matched, so one transition is
/// registered per binary symbol rather than expanding an `AnyOf` set (every
/// expansion of a set shares one write map).
pub fn copy_word(
    builder: &mut TuringMachineBuilder,
    state: usize,
    from: TapeDirection,
    to: &[TapeDirection],
) {
    for symbol in [Symbol::Zero, Symbol::One] {
        let writes: Vec<(usize, Symbol)> =
            to.iter().map(|tape| (tape.index, symbol)).collect();
        let mut shifts: Vec<(usize, Shift)> = vec![(from.index, from.shift)];
        shifts.extend(to.iter().map(|tape| (tape.index, tape.shift)));

        builder.add_transition(
            state,
            state,
            &[(from.index, Pattern::One(symbol))],
            &writes,
            &shifts,
        );
    }
}

/// Blanks out the word the head sits on, walking from the low bit leftward,
/// then steps off its left end into `end`.
pub fn erase_word(
    builder: &mut TuringMachineBuilder,
    start: usize,
    end: usize,
    tape_index: usize,
) {
    builder.add_transition(
        start,
        start,
        &[(tape_index, Pattern::from([Symbol::Zero, Symbol::One]))],
        &[(tape_index, Symbol::Blank)],
        &[(tape_index, Shift::Left)],
    );

    builder.add_single_tape_transition(
        start,
        end,
        tape_index,
        SingleTapeTransition::new(Some(Symbol::Blank), Some(Symbol::Blank), Some(Shift::Left)),
    );
}

/// Builds the grade-school binary multiplication machine.
///
/// The input tape carries both operands most-significant-bit first, separated
/// by one blank; the product ends up on tape [`OUTPUT_TAPE`] with the head
/// parked on its highest digit.
///
/// Four tapes: `input` holds the operands, `output` accumulates the product,
/// `arg1` keeps a working copy of the first operand, and `carry` is the
/// single-cell carry store of the ripple adder. The machine walks the input
/// head back to the first operand, copies it onto `arg1`, then consumes the
/// second operand bit by bit from the high end: every bit doubles the
/// accumulated product, and a 1-bit also adds `arg1` into it.
pub fn grade_school() -> Result<TuringMachine, TuringMachineError> {
    let mut builder = TuringMachineBuilder::new();

    let input = builder.get_or_create_tape_index("input");
    let output = builder.get_or_create_tape_index("output");
    let arg1 = builder.get_or_create_tape_index("arg1");
    let carry = builder.get_or_create_tape_index("carry");

    let start = builder.get_or_create_state("start", false);
    let rewind_arg2 = builder.get_or_create_state("rewind_arg2", false);
    let rewind_arg1 = builder.get_or_create_state("rewind_arg1", false);
    let copy_arg1 = builder.get_or_create_state("copy_arg1", false);
    let process_arg2 = builder.get_or_create_state("process_arg2", false);
    let append_zero = builder.get_or_create_state("append_zero", false);
    let add = builder.get_or_create_state("add", false);
    let align_sum = builder.get_or_create_state("align_sum", false);
    let rewind_sum = builder.get_or_create_state("rewind_sum", false);
    let reset_arg1 = builder.get_or_create_state("reset_arg1", false);
    let park = builder.get_or_create_state("park", false);
    let halt = builder.get_or_create_state("halt", true);

    builder.set_starting_state(start);

    // Loading leaves the input head just past the second operand; walk it
    // back over both operands to the leftmost bit of the first.
    builder.add_single_tape_transition(
        start,
        start,
        input,
        SingleTapeTransition::new(Some(Symbol::Blank), None, Some(Shift::Left)),
    );
    builder.add_transition(
        start,
        rewind_arg2,
        &[(input, Pattern::from([Symbol::Zero, Symbol::One]))],
        &[],
        &[],
    );

    move_across_word(&mut builder, rewind_arg2, TapeDirection::new(input, Shift::Left));
    builder.add_single_tape_transition(
        rewind_arg2,
        rewind_arg1,
        input,
        SingleTapeTransition::new(Some(Symbol::Blank), None, Some(Shift::Left)),
    );

    move_across_word(&mut builder, rewind_arg1, TapeDirection::new(input, Shift::Left));
    builder.add_single_tape_transition(
        rewind_arg1,
        copy_arg1,
        input,
        SingleTapeTransition::new(Some(Symbol::Blank), None, Some(Shift::Right)),
    );

    // Copy the first operand onto the arg1 tape. On the separator blank the
    // input head moves on to the second operand's leading bit, the arg1 head
    // steps back onto the low bit, and the carry cell is cleared.
    copy_word(
        &mut builder,
        copy_arg1,
        TapeDirection::new(input, Shift::Right),
        &[TapeDirection::new(arg1, Shift::Right)],
    );
    builder.add_transition(
        copy_arg1,
        process_arg2,
        &[(input, Pattern::One(Symbol::Blank))],
        &[(carry, Symbol::Zero)],
        &[(input, Shift::Right), (arg1, Shift::Left)],
    );

    // One multiplier bit per visit: a 0 doubles the accumulated product, a 1
    // doubles it and adds arg1. Both first extend the accumulator by one cell
    // on the low end.
    builder.add_transition(
        process_arg2,
        append_zero,
        &[(input, Pattern::One(Symbol::Zero))],
        &[],
        &[(output, Shift::Right)],
    );
    builder.add_transition(
        process_arg2,
        add,
        &[(input, Pattern::One(Symbol::One))],
        &[],
        &[(output, Shift::Right)],
    );
    builder.add_transition(
        process_arg2,
        park,
        &[(input, Pattern::One(Symbol::Blank))],
        &[],
        &[],
    );

    // Doubling writes an explicit low 0 so the accumulator stays one
    // contiguous run of digits.
    builder.add_transition(
        append_zero,
        process_arg2,
        &[(output, Pattern::One(Symbol::Blank))],
        &[(output, Symbol::Zero)],
        &[(input, Shift::Right)],
    );

    // Ripple-add arg1 into the accumulator, low bit to high: write the sum
    // bit, store the carry, march both heads left. An accumulator cell past
    // the word's high end reads blank and counts as 0.
    for output_bit in 0..=1u64 {
        for arg_bit in 0..=1u64 {
            for carry_bit in 0..=1u64 {
                let total = output_bit + arg_bit + carry_bit;
                let accumulator = if output_bit == 1 {
                    Pattern::One(Symbol::One)
                } else {
                    Pattern::from([Symbol::Blank, Symbol::Zero])
                };

                builder.add_transition(
                    add,
                    add,
                    &[
                        (output, accumulator),
                        (arg1, Pattern::One(Symbol::from_bit(arg_bit))),
                        (carry, Pattern::One(Symbol::from_bit(carry_bit))),
                    ],
                    &[
                        (output, Symbol::from_bit(total & 1)),
                        (carry, Symbol::from_bit(total >> 1)),
                    ],
                    &[(output, Shift::Left), (arg1, Shift::Left)],
                );
            }
        }
    }

    // arg1 exhausted: settle the carry. A pending carry over a 1 keeps
    // rippling left; otherwise it lands in the cell under the head and the
    // arg1 head turns around.
    builder.add_transition(
        add,
        align_sum,
        &[
            (arg1, Pattern::One(Symbol::Blank)),
            (carry, Pattern::One(Symbol::Zero)),
        ],
        &[],
        &[(arg1, Shift::Right)],
    );
    builder.add_transition(
        add,
        align_sum,
        &[
            (arg1, Pattern::One(Symbol::Blank)),
            (carry, Pattern::One(Symbol::One)),
            (output, Pattern::from([Symbol::Blank, Symbol::Zero])),
        ],
        &[(output, Symbol::One), (carry, Symbol::Zero)],
        &[(arg1, Shift::Right)],
    );
    builder.add_transition(
        add,
        add,
        &[
            (arg1, Pattern::One(Symbol::Blank)),
            (carry, Pattern::One(Symbol::One)),
            (output, Pattern::One(Symbol::One)),
        ],
        &[(output, Symbol::Zero)],
        &[(output, Shift::Left)],
    );

    // The addition may stop one cell left of the sum's high digit; step onto
    // a digit before walking back to the low end.
    builder.add_single_tape_transition(
        align_sum,
        rewind_sum,
        output,
        SingleTapeTransition::new(Some(Symbol::Blank), None, Some(Shift::Right)),
    );
    builder.add_transition(
        align_sum,
        rewind_sum,
        &[(output, Pattern::from([Symbol::Zero, Symbol::One]))],
        &[],
        &[],
    );

    move_across_word(&mut builder, rewind_sum, TapeDirection::new(output, Shift::Right));
    builder.add_single_tape_transition(
        rewind_sum,
        reset_arg1,
        output,
        SingleTapeTransition::new(Some(Symbol::Blank), None, Some(Shift::Left)),
    );

    move_across_word(&mut builder, reset_arg1, TapeDirection::new(arg1, Shift::Right));
    builder.add_transition(
        reset_arg1,
        process_arg2,
        &[(arg1, Pattern::One(Symbol::Blank))],
        &[],
        &[(arg1, Shift::Left), (input, Shift::Right)],
    );

    // All multiplier bits consumed: park the output head on the highest
    // digit of the product and halt.
    move_across_word(&mut builder, park, TapeDirection::new(output, Shift::Left));
    builder.add_single_tape_transition(
        park,
        halt,
        output,
        SingleTapeTransition::new(Some(Symbol::Blank), None, Some(Shift::Right)),
    );

    builder.create()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::encoder::{encode_operands, read_binary};

    fn multiply(arg1: u64, arg2: u64) -> u64 {
        let mut machine = grade_school().unwrap();
        machine
            .set_input_tape_values(&encode_operands(&[arg1, arg2]), true)
            .unwrap();
        machine.run(None);
        assert!(machine.is_halted());

        read_binary(machine.tape_mut(OUTPUT_TAPE))
    }

    #[test]
    fn test_grade_school_multiplies_small_operands() {
        for arg1 in 1..=10 {
            for arg2 in 1..=10 {
                assert_eq!(multiply(arg1, arg2), arg1 * arg2, "{arg1} * {arg2}");
            }
        }
    }

    #[test]
    fn test_five_times_three_leaves_1111_on_the_output_tape() {
        let mut machine = grade_school().unwrap();
        machine
            .set_input_tape_values(&encode_operands(&[5, 3]), true)
            .unwrap();
        machine.run(None);

        // The head halts on the highest digit; the word runs rightward until
        // the first blank.
        let tape = machine.tape_mut(OUTPUT_TAPE);
        let mut digits = Vec::new();
        while tape.read() != Symbol::Blank {
            digits.push(tape.read());
            tape.shift(Shift::Right);
        }
        assert_eq!(digits, vec![Symbol::One; 4]);
    }

    #[test]
    fn test_one_times_ten_keeps_the_inner_zero() {
        let mut machine = grade_school().unwrap();
        machine
            .set_input_tape_values(&encode_operands(&[1, 10]), true)
            .unwrap();
        machine.run(None);

        assert_eq!(read_binary(machine.tape_mut(OUTPUT_TAPE)), 10);
    }

    #[test]
    fn test_machine_is_reusable_after_reset() {
        let mut machine = grade_school().unwrap();
        machine
            .set_input_tape_values(&encode_operands(&[5, 3]), true)
            .unwrap();
        machine.run(None);
        assert_eq!(read_binary(machine.tape_mut(OUTPUT_TAPE)), 15);

        machine.reset();
        assert_eq!(machine.num_steps(), 0);

        machine
            .set_input_tape_values(&encode_operands(&[7, 9]), true)
            .unwrap();
        machine.run(None);
        assert_eq!(read_binary(machine.tape_mut(OUTPUT_TAPE)), 63);
    }

    #[test]
    fn test_grade_school_program_passes_analysis() {
        let machine = grade_school().unwrap();
        let program = machine.program();

        assert!(analyze(program).is_ok());
        assert_eq!(program.num_tapes, 4);
        assert_eq!(program.num_states, 12);

        // Sparse rules plus set expansion stay far under the 3^4 = 81
        // combinations per state pair a dense table would need.
        assert_eq!(program.transition_count(), 44);
    }

    #[test]
    fn test_move_across_word_walks_to_the_terminating_blank() {
        let mut builder = TuringMachineBuilder::new();
        let tape = builder.get_or_create_tape_index("tape");
        let scan = builder.get_or_create_state("scan", false);
        let done = builder.get_or_create_state("done", true);
        builder.set_starting_state(scan);

        move_across_word(&mut builder, scan, TapeDirection::new(tape, Shift::Right));
        builder.add_single_tape_transition(
            scan,
            done,
            tape,
            SingleTapeTransition::new(Some(Symbol::Blank), None, None),
        );

        let mut machine = builder.create().unwrap();
        machine
            .set_input_tape_values(&[Symbol::One, Symbol::Zero, Symbol::One], true)
            .unwrap();
        machine.tape_mut(0).seek(0);
        machine.run(None);

        assert!(machine.is_halted());
        assert_eq!(machine.tape(0).head(), 3);
        assert_eq!(machine.num_steps(), 4);
    }

    #[test]
    fn test_copy_word_mirrors_the_source_word() {
        let mut builder = TuringMachineBuilder::new();
        let source = builder.get_or_create_tape_index("source");
        let target = builder.get_or_create_tape_index("target");
        let copy = builder.get_or_create_state("copy", false);
        let done = builder.get_or_create_state("done", true);
        builder.set_starting_state(copy);

        copy_word(
            &mut builder,
            copy,
            TapeDirection::new(source, Shift::Right),
            &[TapeDirection::new(target, Shift::Right)],
        );
        builder.add_single_tape_transition(
            copy,
            done,
            source,
            SingleTapeTransition::new(Some(Symbol::Blank), None, None),
        );

        let word = [Symbol::One, Symbol::One, Symbol::Zero];
        let mut machine = builder.create().unwrap();
        machine.set_input_tape_values(&word, true).unwrap();
        machine.tape_mut(0).seek(0);
        machine.run(None);

        let copied = machine.tape_mut(target);
        copied.seek(0);
        for &expected in &word {
            assert_eq!(copied.read(), expected);
            copied.shift(Shift::Right);
        }
        assert_eq!(copied.read(), Symbol::Blank);
    }

    #[test]
    fn test_erase_word_blanks_the_word() {
        let mut builder = TuringMachineBuilder::new();
        let tape = builder.get_or_create_tape_index("tape");
        let erase = builder.get_or_create_state("erase", false);
        let done = builder.get_or_create_state("done", true);
        builder.set_starting_state(erase);

        erase_word(&mut builder, erase, done, tape);

        let mut machine = builder.create().unwrap();
        machine
            .set_input_tape_values(&[Symbol::One, Symbol::Zero, Symbol::One], true)
            .unwrap();
        // Erasure starts from the word's low bit and walks left.
        machine.tape_mut(0).seek(2);
        machine.run(None);

        assert!(machine.is_halted());
        let tape = machine.tape_mut(0);
        for position in -1..=3 {
            tape.seek(position);
            assert_eq!(tape.read(), Symbol::Blank, "position {position}");
        }
    }
}

//! Run-length compressed move queue
//!
//! Repeated taps on the same arrow collapse into one instruction, so no two
//! adjacent entries ever share a direction.

use serde::{Deserialize, Serialize};

use super::grid::Direction;

/// A merged (direction, step count) unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub direction: Direction,
    pub steps: u32,
}

impl Instruction {
    pub const fn new(direction: Direction, steps: u32) -> Self {
        Self { direction, steps }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionQueue {
    instructions: Vec<Instruction>,
}

impl InstructionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one step in `direction`, merging with the last entry if it matches
    pub fn append(&mut self, direction: Direction) {
        self.append_steps(direction, 1);
    }

    /// Add `steps` moves in `direction`. Zero steps is a no-op.
    pub fn append_steps(&mut self, direction: Direction, steps: u32) {
        if steps == 0 {
            return;
        }
        match self.instructions.last_mut() {
            Some(last) if last.direction == direction => last.steps += steps,
            _ => self.instructions.push(Instruction::new(direction, steps)),
        }
    }

    /// Drop the whole last instruction (not a single step)
    pub fn remove_last(&mut self) -> Option<Instruction> {
        self.instructions.pop()
    }

    pub fn clear(&mut self) {
        self.instructions.clear();
    }

    pub fn total_steps(&self) -> u32 {
        self.instructions.iter().map(|i| i.steps).sum()
    }

    /// Steps contained in the instructions strictly before `index`
    pub fn steps_before(&self, index: usize) -> u32 {
        self.instructions
            .iter()
            .take(index)
            .map(|i| i.steps)
            .sum()
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    pub fn as_slice(&self) -> &[Instruction] {
        &self.instructions
    }
}

impl FromIterator<Instruction> for InstructionQueue {
    fn from_iter<T: IntoIterator<Item = Instruction>>(iter: T) -> Self {
        let mut queue = Self::new();
        for instruction in iter {
            queue.append_steps(instruction.direction, instruction.steps);
        }
        queue
    }
}

impl<'a> IntoIterator for &'a InstructionQueue {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_append_merges_same_direction() {
        let mut queue = InstructionQueue::new();
        queue.append(Direction::Right);
        queue.append(Direction::Right);
        assert_eq!(queue.as_slice(), &[Instruction::new(Direction::Right, 2)]);
    }

    #[test]
    fn test_append_new_direction() {
        let mut queue = InstructionQueue::new();
        queue.append(Direction::Right);
        queue.append(Direction::Up);
        assert_eq!(
            queue.as_slice(),
            &[
                Instruction::new(Direction::Right, 1),
                Instruction::new(Direction::Up, 1)
            ]
        );
        assert_eq!(queue.total_steps(), 2);
    }

    #[test]
    fn test_remove_last_drops_whole_instruction() {
        let mut queue = InstructionQueue::new();
        queue.append(Direction::Up);
        queue.append_steps(Direction::Left, 3);
        assert_eq!(
            queue.remove_last(),
            Some(Instruction::new(Direction::Left, 3))
        );
        assert_eq!(queue.total_steps(), 1);

        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.remove_last(), None);
        assert_eq!(queue.total_steps(), 0);
    }

    #[test]
    fn test_steps_before() {
        let queue: InstructionQueue = [
            Instruction::new(Direction::Right, 2),
            Instruction::new(Direction::Down, 3),
            Instruction::new(Direction::Left, 1),
        ]
        .into_iter()
        .collect();
        assert_eq!(queue.steps_before(0), 0);
        assert_eq!(queue.steps_before(2), 5);
        assert_eq!(queue.steps_before(10), 6);
    }

    #[test]
    fn test_collect_merges_adjacent() {
        let queue: InstructionQueue = [
            Instruction::new(Direction::Down, 1),
            Instruction::new(Direction::Down, 2),
            Instruction::new(Direction::Up, 0),
        ]
        .into_iter()
        .collect();
        assert_eq!(queue.as_slice(), &[Instruction::new(Direction::Down, 3)]);
    }

    fn arb_direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    proptest! {
        #[test]
        fn prop_taps_stay_compressed(taps in prop::collection::vec(arb_direction(), 0..64)) {
            let mut queue = InstructionQueue::new();
            for dir in &taps {
                queue.append(*dir);
            }
            prop_assert_eq!(queue.total_steps() as usize, taps.len());
            for pair in queue.as_slice().windows(2) {
                prop_assert_ne!(pair[0].direction, pair[1].direction);
            }
            prop_assert!(queue.iter().all(|i| i.steps >= 1));
        }
    }
}

//! Desktop pointer automation.
//!
//! [`Pointer`] is the capability the scan loop drives; [`EnigoPointer`]
//! implements it with the enigo crate. [`PointerGuard`] puts the pointer back
//! where the user left it once an automated click is done.

use std::thread;
use std::time::Duration;

use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use serde::{Deserialize, Serialize};

use crate::error::PointerError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Parses a button name; anything unrecognised is the left button.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "right" => MouseButton::Right,
            "middle" => MouseButton::Middle,
            _ => MouseButton::Left,
        }
    }

    fn to_enigo(self) -> Button {
        match self {
            MouseButton::Left => Button::Left,
            MouseButton::Right => Button::Right,
            MouseButton::Middle => Button::Middle,
        }
    }
}

/// Pointer positioning and clicking.
pub trait Pointer {
    fn location(&self) -> Result<(i32, i32), PointerError>;

    fn move_to(&mut self, x: i32, y: i32) -> Result<(), PointerError>;

    /// Presses `button`, holds it for `hold`, then releases it.
    fn click(&mut self, button: MouseButton, hold: Duration) -> Result<(), PointerError>;
}

impl<P: Pointer + ?Sized> Pointer for &mut P {
    fn location(&self) -> Result<(i32, i32), PointerError> {
        (**self).location()
    }

    fn move_to(&mut self, x: i32, y: i32) -> Result<(), PointerError> {
        (**self).move_to(x, y)
    }

    fn click(&mut self, button: MouseButton, hold: Duration) -> Result<(), PointerError> {
        (**self).click(button, hold)
    }
}

/// [`Pointer`] backed by a single enigo connection.
pub struct EnigoPointer {
    enigo: Enigo,
}

impl EnigoPointer {
    pub fn new() -> Result<Self, PointerError> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| PointerError::Unavailable(e.to_string()))?;
        Ok(Self { enigo })
    }
}

impl Pointer for EnigoPointer {
    fn location(&self) -> Result<(i32, i32), PointerError> {
        self.enigo
            .location()
            .map_err(|e| PointerError::Injection(e.to_string()))
    }

    fn move_to(&mut self, x: i32, y: i32) -> Result<(), PointerError> {
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| PointerError::Injection(e.to_string()))
    }

    fn click(&mut self, button: MouseButton, hold: Duration) -> Result<(), PointerError> {
        let button = button.to_enigo();
        self.enigo
            .button(button, Direction::Press)
            .map_err(|e| PointerError::Injection(e.to_string()))?;
        thread::sleep(hold);
        self.enigo
            .button(button, Direction::Release)
            .map_err(|e| PointerError::Injection(e.to_string()))
    }
}

/// Exclusive use of the pointer for one automated action.
///
/// The position at acquisition time is restored when the guard is dropped,
/// whether or not the action in between succeeded.
pub struct PointerGuard<'a, P: Pointer + ?Sized> {
    pointer: &'a mut P,
    home: (i32, i32),
}

impl<'a, P: Pointer + ?Sized> PointerGuard<'a, P> {
    pub fn acquire(pointer: &'a mut P) -> Result<Self, PointerError> {
        let home = pointer.location()?;
        Ok(Self { pointer, home })
    }

    pub fn home(&self) -> (i32, i32) {
        self.home
    }

    /// Moves to (`x`, `y`) and clicks there.
    pub fn click_at(
        &mut self,
        x: i32,
        y: i32,
        button: MouseButton,
        hold: Duration,
    ) -> Result<(), PointerError> {
        self.pointer.move_to(x, y)?;
        self.pointer.click(button, hold)
    }
}

impl<P: Pointer + ?Sized> Drop for PointerGuard<'_, P> {
    fn drop(&mut self) {
        let (x, y) = self.home;
        if let Err(e) = self.pointer.move_to(x, y) {
            log::warn!("Could not restore pointer to ({}, {}): {}", x, y, e);
        }
    }
}

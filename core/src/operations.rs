use log::debug;
use rand::Rng;

use crate::constants::{SPRITE_HEIGHT, SPRITE_SHEET_START};
use crate::error::Chip8Error;
use crate::instruction::Flow;
use crate::keypad::Keypad;
use crate::state::State;

type Outcome = Result<Flow, Chip8Error>;

fn skip_if(condition: bool) -> Flow {
    if condition {
        Flow::Skip
    } else {
        Flow::Next
    }
}

/// call machine code routine at addr; ignored
pub fn sys(addr: u16) -> Outcome {
    debug!("ignoring SYS {:03X}", addr);
    Ok(Flow::Next)
}

/// clear
pub fn clr(state: &mut State) -> Outcome {
    state.frame_buffer.clear();
    state.draw_flag = true;
    Ok(Flow::Next)
}

/// PC = STACK.pop()
pub fn rts(state: &mut State) -> Outcome {
    let address = state.registers.pop()?;
    Ok(Flow::Jump(address))
}

/// PC = addr
pub fn jump(addr: u16) -> Outcome {
    Ok(Flow::Jump(addr))
}

/// STACK.push(PC + 2); PC = addr
pub fn call(state: &mut State, addr: u16) -> Outcome {
    let return_address = state.registers.pc().wrapping_add(2);
    state.registers.push(return_address)?;
    Ok(Flow::Jump(addr))
}

/// if Vx == kk then skip
pub fn ske(state: &mut State, x: u8, kk: u8) -> Outcome {
    Ok(skip_if(state.registers.v(x)? == kk))
}

/// if Vx != kk then skip
pub fn skne(state: &mut State, x: u8, kk: u8) -> Outcome {
    Ok(skip_if(state.registers.v(x)? != kk))
}

/// if Vx == Vy then skip
pub fn skre(state: &mut State, x: u8, y: u8) -> Outcome {
    Ok(skip_if(state.registers.v(x)? == state.registers.v(y)?))
}

/// Vx = kk
pub fn load(state: &mut State, x: u8, kk: u8) -> Outcome {
    state.registers.set_v(x, kk)?;
    Ok(Flow::Next)
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but drop it, VF is left alone
pub fn add(state: &mut State, x: u8, kk: u8) -> Outcome {
    let res = state.registers.v(x)?.wrapping_add(kk);
    state.registers.set_v(x, res)?;
    Ok(Flow::Next)
}

/// Vx = Vy
pub fn mv(state: &mut State, x: u8, y: u8) -> Outcome {
    let vy = state.registers.v(y)?;
    state.registers.set_v(x, vy)?;
    Ok(Flow::Next)
}

/// Vx |= Vy
pub fn or(state: &mut State, x: u8, y: u8) -> Outcome {
    let res = state.registers.v(x)? | state.registers.v(y)?;
    state.registers.set_v(x, res)?;
    Ok(Flow::Next)
}

/// Vx &= Vy
pub fn and(state: &mut State, x: u8, y: u8) -> Outcome {
    let res = state.registers.v(x)? & state.registers.v(y)?;
    state.registers.set_v(x, res)?;
    Ok(Flow::Next)
}

/// Vx ^= Vy
pub fn xor(state: &mut State, x: u8, y: u8) -> Outcome {
    let res = state.registers.v(x)? ^ state.registers.v(y)?;
    state.registers.set_v(x, res)?;
    Ok(Flow::Next)
}

// The flag-setting ALU ops below write VF after Vx, so with x = F the flag wins.

/// Vx += Vy; VF = overflow
pub fn addr(state: &mut State, x: u8, y: u8) -> Outcome {
    let (res, over) = state
        .registers
        .v(x)?
        .overflowing_add(state.registers.v(y)?);
    state.registers.set_v(x, res)?;
    state.registers.set_flag(over);
    Ok(Flow::Next)
}

/// Vx -= Vy; VF = !underflow
pub fn sub(state: &mut State, x: u8, y: u8) -> Outcome {
    let (res, under) = state
        .registers
        .v(x)?
        .overflowing_sub(state.registers.v(y)?);
    state.registers.set_v(x, res)?;
    state.registers.set_flag(!under);
    Ok(Flow::Next)
}

/// Vx /= 2; VF = lsb
pub fn shr(state: &mut State, x: u8) -> Outcome {
    let vx = state.registers.v(x)?;
    state.registers.set_v(x, vx >> 1)?;
    state.registers.set_flag(vx & 0x1 == 0x1);
    Ok(Flow::Next)
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(state: &mut State, x: u8, y: u8) -> Outcome {
    let (res, under) = state
        .registers
        .v(y)?
        .overflowing_sub(state.registers.v(x)?);
    state.registers.set_v(x, res)?;
    state.registers.set_flag(!under);
    Ok(Flow::Next)
}

/// Vx *= 2; VF = msb
pub fn shl(state: &mut State, x: u8) -> Outcome {
    let vx = state.registers.v(x)?;
    state.registers.set_v(x, vx << 1)?;
    state.registers.set_flag(vx & 0x80 == 0x80);
    Ok(Flow::Next)
}

/// if Vx != Vy then skip
pub fn skrne(state: &mut State, x: u8, y: u8) -> Outcome {
    Ok(skip_if(state.registers.v(x)? != state.registers.v(y)?))
}

/// I = addr
pub fn loadi(state: &mut State, addr: u16) -> Outcome {
    state.registers.set_i(addr);
    Ok(Flow::Next)
}

/// PC = V0 + addr
pub fn jumpi(state: &mut State, addr: u16) -> Outcome {
    Ok(Flow::Jump(addr + u16::from(state.registers.v(0x0)?)))
}

/// Vx = rand_byte & kk
pub fn rand<R: Rng + ?Sized>(state: &mut State, x: u8, kk: u8, rng: &mut R) -> Outcome {
    let rand_byte: u8 = rng.gen();
    state.registers.set_v(x, rand_byte & kk)?;
    Ok(Flow::Next)
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs the n byte sprite at memory I.. onto the frame buffer at Vx, Vy.
/// Sets VF if any pixels were erased
pub fn draw(state: &mut State, x: u8, y: u8, n: u8) -> Outcome {
    let vx = state.registers.v(x)? as usize;
    let vy = state.registers.v(y)? as usize;
    let sprite = state.memory.read_slice(state.registers.i(), n as usize)?;

    let collision = state.frame_buffer.draw_sprite(vx, vy, sprite);

    state.registers.set_flag(collision);
    state.draw_flag = true;
    Ok(Flow::Next)
}

/// if Vx.pressed then skip
pub fn skpr(state: &mut State, x: u8, keypad: &Keypad) -> Outcome {
    Ok(skip_if(keypad.is_pressed(state.registers.v(x)?)))
}

/// if !Vx.pressed then skip
pub fn skup(state: &mut State, x: u8, keypad: &Keypad) -> Outcome {
    Ok(skip_if(!keypad.is_pressed(state.registers.v(x)?)))
}

/// Vx = DT
pub fn moved(state: &mut State, x: u8) -> Outcome {
    let delay = state.registers.delay_timer();
    state.registers.set_v(x, delay)?;
    Ok(Flow::Next)
}

/// await keypress for Vx
/// Nothing moves until a key goes down while waiting; the same instruction is retried each cycle
pub fn keyd(state: &mut State, x: u8, keypad: &Keypad) -> Outcome {
    match keypad.latched() {
        Some(key) => {
            state.registers.set_v(x, key)?;
            Ok(Flow::Next)
        }
        None => Ok(Flow::Wait),
    }
}

/// DT = Vx
pub fn setd(state: &mut State, x: u8) -> Outcome {
    let vx = state.registers.v(x)?;
    state.registers.set_delay_timer(vx);
    Ok(Flow::Next)
}

/// ST = Vx
pub fn sets(state: &mut State, x: u8) -> Outcome {
    let vx = state.registers.v(x)?;
    state.registers.set_sound_timer(vx);
    Ok(Flow::Next)
}

/// I += Vx
pub fn addi(state: &mut State, x: u8) -> Outcome {
    let i = state.registers.i().wrapping_add(u16::from(state.registers.v(x)?));
    state.registers.set_i(i);
    Ok(Flow::Next)
}

/// I = address of the sprite for the digit in Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(state: &mut State, x: u8) -> Outcome {
    let digit = u16::from(state.registers.v(x)? & 0xF);
    state
        .registers
        .set_i(SPRITE_SHEET_START + digit * SPRITE_HEIGHT);
    Ok(Flow::Next)
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address I
pub fn bcd(state: &mut State, x: u8) -> Outcome {
    let vx = state.registers.v(x)?;
    let bcd = [vx / 100 % 10, vx / 10 % 10, vx % 10];
    state.memory.write_slice(state.registers.i(), &bcd)?;
    Ok(Flow::Next)
}

/// mem[I..=I+x] = V0..=Vx
/// I is left where it was
pub fn stor(state: &mut State, x: u8) -> Outcome {
    let values = state
        .registers
        .v_all()
        .get(..=x as usize)
        .ok_or(Chip8Error::RegisterOutOfRange { index: x })?;
    state.memory.write_slice(state.registers.i(), values)?;
    Ok(Flow::Next)
}

/// V0..=Vx = mem[I..=I+x]
/// I is left where it was
pub fn read(state: &mut State, x: u8) -> Outcome {
    let values = state
        .memory
        .read_slice(state.registers.i(), x as usize + 1)?;
    for (index, &value) in values.iter().enumerate() {
        state.registers.set_v(index as u8, value)?;
    }
    Ok(Flow::Next)
}

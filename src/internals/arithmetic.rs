/// Stack, arithmetic, comparison, and memory primitives (spec section 4.3).
///
/// All failure modes here are locally recovered per spec section 4.8: a
/// division by zero reports and pushes 0 rather than trapping, and an
/// out-of-arena `@`/`!`/`C@`/`C!` warns and either reads 0 or discards the
/// write, rather than indexing out of bounds.
use crate::kernel::CELL;
use crate::runtime::ForthRuntime;

const TRUE: i64 = -1;
const FALSE: i64 = 0;

impl ForthRuntime {
    // --- stack ---

    pub fn f_drop(&mut self) {
        self.kernel.pop(&self.msg);
    }

    pub fn f_dup(&mut self) {
        let v = self.kernel.top(&self.msg);
        self.kernel.push(v, &self.msg);
    }

    pub fn f_swap(&mut self) {
        let a = self.kernel.pop(&self.msg);
        let b = self.kernel.pop(&self.msg);
        self.kernel.push(a, &self.msg);
        self.kernel.push(b, &self.msg);
    }

    pub fn f_rot(&mut self) {
        let c = self.kernel.pop(&self.msg);
        let b = self.kernel.pop(&self.msg);
        let a = self.kernel.pop(&self.msg);
        self.kernel.push(b, &self.msg);
        self.kernel.push(c, &self.msg);
        self.kernel.push(a, &self.msg);
    }

    pub fn f_over(&mut self) {
        let v = self.kernel.peek(1, &self.msg);
        self.kernel.push(v, &self.msg);
    }

    pub fn f_dot_s(&mut self) {
        print!("STACK > ");
        let depth = self.kernel.sp();
        for i in (0..depth).rev() {
            print!("{} ", self.kernel.peek(depth - 1 - i, &self.msg));
        }
        println!();
    }

    pub fn f_dot(&mut self) {
        let v = self.kernel.pop(&self.msg);
        println!("{}", v);
    }

    // --- arithmetic ---

    pub fn f_plus(&mut self) {
        let b = self.kernel.pop(&self.msg);
        let a = self.kernel.pop(&self.msg);
        self.kernel.push(a.wrapping_add(b), &self.msg);
    }

    pub fn f_minus(&mut self) {
        let b = self.kernel.pop(&self.msg);
        let a = self.kernel.pop(&self.msg);
        self.kernel.push(a.wrapping_sub(b), &self.msg);
    }

    pub fn f_times(&mut self) {
        let b = self.kernel.pop(&self.msg);
        let a = self.kernel.pop(&self.msg);
        self.kernel.push(a.wrapping_mul(b), &self.msg);
    }

    pub fn f_divide(&mut self) {
        let b = self.kernel.pop(&self.msg);
        let a = self.kernel.pop(&self.msg);
        if b == 0 {
            self.msg.error("/", "Division by zero error", None::<()>);
            self.kernel.push(0, &self.msg);
        } else {
            self.kernel.push(a / b, &self.msg);
        }
    }

    pub fn f_mod(&mut self) {
        let b = self.kernel.pop(&self.msg);
        let a = self.kernel.pop(&self.msg);
        if b == 0 {
            self.msg.error("mod", "Division by zero error", None::<()>);
            self.kernel.push(0, &self.msg);
        } else {
            self.kernel.push(a % b, &self.msg);
        }
    }

    pub fn f_1plus(&mut self) {
        let v = self.kernel.pop(&self.msg);
        self.kernel.push(v.wrapping_add(1), &self.msg);
    }

    pub fn f_1minus(&mut self) {
        let v = self.kernel.pop(&self.msg);
        self.kernel.push(v.wrapping_sub(1), &self.msg);
    }

    // --- comparison ---

    pub fn f_equal(&mut self) {
        let b = self.kernel.pop(&self.msg);
        let a = self.kernel.pop(&self.msg);
        self.kernel.push(if a == b { TRUE } else { FALSE }, &self.msg);
    }

    pub fn f_less(&mut self) {
        let b = self.kernel.pop(&self.msg);
        let a = self.kernel.pop(&self.msg);
        self.kernel.push(if a < b { TRUE } else { FALSE }, &self.msg);
    }

    pub fn f_greater(&mut self) {
        let b = self.kernel.pop(&self.msg);
        let a = self.kernel.pop(&self.msg);
        self.kernel.push(if a > b { TRUE } else { FALSE }, &self.msg);
    }

    pub fn f_0equal(&mut self) {
        let v = self.kernel.pop(&self.msg);
        self.kernel.push(if v == 0 { TRUE } else { FALSE }, &self.msg);
    }

    // --- memory ---

    pub fn f_fetch(&mut self) {
        let addr = self.kernel.pop(&self.msg) as usize;
        if self.kernel.arena_bounds_check(addr, CELL) {
            let v = self.kernel.get_cell(addr);
            self.kernel.push(v, &self.msg);
        } else {
            self.msg.warning("@", "Address out of bounds", Some(addr));
            self.kernel.push(0, &self.msg);
        }
    }

    pub fn f_store(&mut self) {
        let addr = self.kernel.pop(&self.msg) as usize;
        let value = self.kernel.pop(&self.msg);
        if self.kernel.arena_bounds_check(addr, CELL) {
            self.kernel.set_cell(addr, value);
        } else {
            self.msg.warning("!", "Address out of bounds", Some(addr));
        }
    }

    pub fn f_c_fetch(&mut self) {
        let addr = self.kernel.pop(&self.msg) as usize;
        if self.kernel.arena_bounds_check(addr, 1) {
            let v = self.kernel.get_u8(addr);
            self.kernel.push(v as i64, &self.msg);
        } else {
            self.msg.warning("c@", "Address out of bounds", Some(addr));
            self.kernel.push(0, &self.msg);
        }
    }

    pub fn f_c_store(&mut self) {
        let addr = self.kernel.pop(&self.msg) as usize;
        let value = self.kernel.pop(&self.msg);
        if self.kernel.arena_bounds_check(addr, 1) {
            self.kernel.set_u8(addr, value as u8);
        } else {
            self.msg.warning("c!", "Address out of bounds", Some(addr));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_binary(name: &str, a: i64, b: i64) -> i64 {
        let mut rt = ForthRuntime::new();
        rt.cold_start();
        rt.kernel.push(a, &rt.msg);
        rt.kernel.push(b, &rt.msg);
        let header = rt.find(name.as_bytes()).unwrap();
        let cfa = rt.code_field_of(header);
        rt.execute_word(cfa);
        rt.kernel.top(&rt.msg)
    }

    #[test]
    fn test_plus() {
        assert_eq!(run_binary("+", 2, 3), 5);
    }

    #[test]
    fn test_divide_by_zero_pushes_zero() {
        assert_eq!(run_binary("/", 7, 0), 0);
    }

    #[test]
    fn test_dup_drop_balance() {
        let mut rt = ForthRuntime::new();
        rt.cold_start();
        rt.kernel.push(99, &rt.msg);
        let before = rt.kernel.sp();
        let dup = rt.code_field_of(rt.find(b"dup").unwrap());
        rt.execute_word(dup);
        let drop_cfa = rt.code_field_of(rt.find(b"drop").unwrap());
        rt.execute_word(drop_cfa);
        assert_eq!(rt.kernel.sp(), before);
        assert_eq!(rt.kernel.top(&rt.msg), 99);
    }

    #[test]
    fn test_fetch_out_of_bounds_returns_zero() {
        let mut rt = ForthRuntime::new();
        rt.cold_start();
        rt.kernel.push(1_000_000, &rt.msg);
        let at = rt.code_field_of(rt.find(b"@").unwrap());
        rt.execute_word(at);
        assert_eq!(rt.kernel.top(&rt.msg), 0);
    }

    #[test]
    fn test_cell_store_fetch_roundtrip() {
        let mut rt = ForthRuntime::new();
        rt.cold_start();
        rt.kernel.push(42, &rt.msg);
        rt.kernel.push(256, &rt.msg);
        let store = rt.code_field_of(rt.find(b"!").unwrap());
        rt.execute_word(store);
        rt.kernel.push(256, &rt.msg);
        let fetch = rt.code_field_of(rt.find(b"@").unwrap());
        rt.execute_word(fetch);
        assert_eq!(rt.kernel.top(&rt.msg), 42);
    }
}

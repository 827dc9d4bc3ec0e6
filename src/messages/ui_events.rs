//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Application screens
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Screen {
    #[default]
    SignIn,
    SignUp,
    Sales,
    Cart,
    Products,
    Suppliers,
    PurchaseOrders,
    LowStock,
    Settings,
}

impl Screen {
    /// Screens reachable from the tab bar once signed in
    pub const TABS: [Screen; 7] = [
        Screen::Sales,
        Screen::Cart,
        Screen::Products,
        Screen::Suppliers,
        Screen::PurchaseOrders,
        Screen::LowStock,
        Screen::Settings,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Screen::SignIn => "Sign in",
            Screen::SignUp => "Sign up",
            Screen::Sales => "Sales",
            Screen::Cart => "Cart",
            Screen::Products => "Products",
            Screen::Suppliers => "Suppliers",
            Screen::PurchaseOrders => "Purchase orders",
            Screen::LowStock => "Low stock",
            Screen::Settings => "Settings",
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Screen::SignIn | Screen::SignUp)
    }

    fn from_digit(c: char) -> Option<Screen> {
        let index = c.to_digit(10)? as usize;
        index.checked_sub(1).and_then(|i| Screen::TABS.get(i)).copied()
    }
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Navigation
    SwitchScreen(Screen),
    Up,
    Down,

    // Input editing (forms, search boxes, scanner and payment entry)
    StartSearch,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,
    NextField,
    PrevField,
    Submit,
    Cancel,

    // Lists
    Open,
    New,
    Edit,
    Delete,
    Refresh,

    // Sign in / sign up
    GoToSignUp,
    ResetPassword,

    // Sales
    CycleCategory,
    ScanBarcode,
    AddToCart,

    // Cart
    Increase,
    Decrease,
    RemoveLine,
    CycleCurrency,
    ChooseCustomer,
    EnterPayment,
    SubmitSale,
    PrintReceipt,

    // Products
    Transfer,

    // Purchase orders
    AddOrderItem,
    RemoveOrderItem,
    DownloadPdf,

    // Settings
    EditPrinter,
    TestPrint,
    ChangePassword,
    SignOut,

    // Modals
    Confirm,
    Deny,
    DismissNotice,
    Retry,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Which modal, if any, is capturing keys
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Overlay {
    #[default]
    None,
    Notice,
    Confirm,
    Help,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    screen: Screen,
    input_mode: InputMode,
    overlay: Overlay,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return Some(UiEvent::Quit),
            KeyCode::Char('u') if screen == Screen::SignIn => return Some(UiEvent::GoToSignUp),
            KeyCode::Char('r') if screen == Screen::SignIn => return Some(UiEvent::ResetPassword),
            KeyCode::Char('n') if screen == Screen::PurchaseOrders => return Some(UiEvent::AddOrderItem),
            KeyCode::Char('d') if screen == Screen::PurchaseOrders => return Some(UiEvent::RemoveOrderItem),
            _ => return None,
        }
    }

    match overlay {
        Overlay::Help => return Some(UiEvent::CloseHelp),
        Overlay::Notice => {
            return match key.code {
                KeyCode::Char('r') => Some(UiEvent::Retry),
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Some(UiEvent::DismissNotice),
                _ => None,
            };
        }
        Overlay::Confirm => {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Enter => Some(UiEvent::Confirm),
                KeyCode::Char('n') | KeyCode::Esc => Some(UiEvent::Deny),
                _ => None,
            };
        }
        Overlay::None => {}
    }

    if input_mode == InputMode::Editing {
        return handle_editing_keys(key);
    }

    // Screen switching by number (signed-in screens only)
    if let KeyCode::Char(c) = key.code {
        if !screen.is_auth() {
            if let Some(target) = Screen::from_digit(c) {
                return Some(UiEvent::SwitchScreen(target));
            }
        }
    }

    match key.code {
        KeyCode::Char('q') => return Some(UiEvent::Quit),
        KeyCode::Char('?') => return Some(UiEvent::ToggleHelp),
        KeyCode::Up | KeyCode::Char('k') => return Some(UiEvent::Up),
        KeyCode::Down | KeyCode::Char('j') => return Some(UiEvent::Down),
        _ => {}
    }

    match screen {
        Screen::SignIn | Screen::SignUp => None,
        Screen::Sales => handle_sales_keys(key),
        Screen::Cart => handle_cart_keys(key),
        Screen::Products => handle_products_keys(key),
        Screen::Suppliers => handle_suppliers_keys(key),
        Screen::PurchaseOrders => handle_orders_keys(key),
        Screen::LowStock => handle_low_stock_keys(key),
        Screen::Settings => handle_settings_keys(key),
    }
}

fn handle_editing_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::Cancel),
        KeyCode::Enter => Some(UiEvent::Submit),
        KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevField),
        KeyCode::Left => Some(UiEvent::CursorLeft),
        KeyCode::Right => Some(UiEvent::CursorRight),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        _ => None,
    }
}

fn handle_sales_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Enter | KeyCode::Char('a') => Some(UiEvent::AddToCart),
        KeyCode::Char('/') => Some(UiEvent::StartSearch),
        KeyCode::Char('c') => Some(UiEvent::CycleCategory),
        KeyCode::Char('b') => Some(UiEvent::ScanBarcode),
        KeyCode::Char('r') => Some(UiEvent::Refresh),
        _ => None,
    }
}

fn handle_cart_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('+') | KeyCode::Char('=') => Some(UiEvent::Increase),
        KeyCode::Char('-') => Some(UiEvent::Decrease),
        KeyCode::Char('x') | KeyCode::Delete => Some(UiEvent::RemoveLine),
        KeyCode::Char('u') => Some(UiEvent::CycleCurrency),
        KeyCode::Char('c') => Some(UiEvent::ChooseCustomer),
        KeyCode::Char('p') => Some(UiEvent::EnterPayment),
        KeyCode::Char('s') => Some(UiEvent::SubmitSale),
        KeyCode::Char('P') => Some(UiEvent::PrintReceipt),
        KeyCode::Esc => Some(UiEvent::SwitchScreen(Screen::Sales)),
        _ => None,
    }
}

fn handle_products_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('/') => Some(UiEvent::StartSearch),
        KeyCode::Char('n') => Some(UiEvent::New),
        KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::Edit),
        KeyCode::Char('d') => Some(UiEvent::Delete),
        KeyCode::Char('t') => Some(UiEvent::Transfer),
        KeyCode::Char('r') => Some(UiEvent::Refresh),
        _ => None,
    }
}

fn handle_suppliers_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('/') => Some(UiEvent::StartSearch),
        KeyCode::Char('n') => Some(UiEvent::New),
        KeyCode::Char('e') => Some(UiEvent::Edit),
        KeyCode::Enter => Some(UiEvent::Open),
        KeyCode::Esc => Some(UiEvent::Cancel),
        KeyCode::Char('d') => Some(UiEvent::Delete),
        KeyCode::Char('r') => Some(UiEvent::Refresh),
        _ => None,
    }
}

fn handle_orders_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('n') => Some(UiEvent::New),
        KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::Edit),
        KeyCode::Char('d') => Some(UiEvent::Delete),
        KeyCode::Char('f') => Some(UiEvent::DownloadPdf),
        KeyCode::Char('r') => Some(UiEvent::Refresh),
        _ => None,
    }
}

fn handle_low_stock_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Enter => Some(UiEvent::Open),
        KeyCode::Esc => Some(UiEvent::Cancel),
        KeyCode::Char('r') => Some(UiEvent::Refresh),
        _ => None,
    }
}

fn handle_settings_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('p') => Some(UiEvent::EditPrinter),
        KeyCode::Char('t') => Some(UiEvent::TestPrint),
        KeyCode::Char('w') => Some(UiEvent::ChangePassword),
        KeyCode::Char('o') => Some(UiEvent::SignOut),
        KeyCode::Char('r') => Some(UiEvent::Refresh),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn digits_switch_screens_when_signed_in() {
        let event = key_to_ui_event(press(KeyCode::Char('3')), Screen::Sales, InputMode::Normal, Overlay::None);
        assert_eq!(event, Some(UiEvent::SwitchScreen(Screen::Products)));
        let event = key_to_ui_event(press(KeyCode::Char('9')), Screen::Sales, InputMode::Normal, Overlay::None);
        assert_eq!(event, None);
    }

    #[test]
    fn editing_captures_letters() {
        let event = key_to_ui_event(press(KeyCode::Char('q')), Screen::Products, InputMode::Editing, Overlay::None);
        assert_eq!(event, Some(UiEvent::CharInput('q')));
        let event = key_to_ui_event(press(KeyCode::Char('3')), Screen::SignIn, InputMode::Editing, Overlay::None);
        assert_eq!(event, Some(UiEvent::CharInput('3')));
    }

    #[test]
    fn overlays_take_priority() {
        let event = key_to_ui_event(press(KeyCode::Char('r')), Screen::LowStock, InputMode::Normal, Overlay::Notice);
        assert_eq!(event, Some(UiEvent::Retry));
        let event = key_to_ui_event(press(KeyCode::Char('y')), Screen::Products, InputMode::Editing, Overlay::Confirm);
        assert_eq!(event, Some(UiEvent::Confirm));
    }

    #[test]
    fn control_shortcuts() {
        let key = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(
            key_to_ui_event(key, Screen::SignIn, InputMode::Editing, Overlay::None),
            Some(UiEvent::GoToSignUp)
        );
        let key = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL);
        assert_eq!(
            key_to_ui_event(key, Screen::PurchaseOrders, InputMode::Editing, Overlay::None),
            Some(UiEvent::AddOrderItem)
        );
    }
}

//! App actor - message loop processing UI events and network responses

use std::time::Duration;
use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        let refresh_secs = self.state.settings.low_stock_refresh_secs.max(1);
        let mut low_stock_tick = tokio::time::interval(Duration::from_secs(refresh_secs));
        low_stock_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        self.state.restore_session();
        self.flush();

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    self.flush();
                }
                Some(response) = net_rx.recv() => {
                    self.state.handle_response(response);
                    self.flush();
                }
                _ = low_stock_tick.tick() => {
                    self.state.tick();
                    self.flush();
                }
                else => break,
            }
        }
    }

    /// Forward queued network commands, then publish a fresh render state
    fn flush(&mut self) {
        for cmd in self.state.take_commands() {
            let _ = self.network_tx.send(cmd);
        }
        let _ = self.render_tx.send(self.state.to_render_state());
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Navigation
            UiEvent::SwitchScreen(screen) => self.state.switch_screen(screen),
            UiEvent::Up => self.state.select_prev(),
            UiEvent::Down => self.state.select_next(),

            // Input editing
            UiEvent::StartSearch => self.state.start_search(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),
            UiEvent::NextField => self.state.next_field(),
            UiEvent::PrevField => self.state.prev_field(),
            UiEvent::Submit => self.state.submit(),
            UiEvent::Cancel => self.state.cancel(),

            // Lists
            UiEvent::Open => self.state.open_selected(),
            UiEvent::New => self.state.new_record(),
            UiEvent::Edit => self.state.edit_selected(),
            UiEvent::Delete => self.state.delete_selected(),
            UiEvent::Refresh => self.state.refresh(),

            // Sign in / sign up
            UiEvent::GoToSignUp => self.state.go_to_sign_up(),
            UiEvent::ResetPassword => self.state.reset_password(),

            // Sales
            UiEvent::CycleCategory => self.state.cycle_category(),
            UiEvent::ScanBarcode => self.state.start_scan(),
            UiEvent::AddToCart => self.state.add_selected_to_cart(),

            // Cart
            UiEvent::Increase => self.state.increase_quantity(),
            UiEvent::Decrease => self.state.decrease_quantity(),
            UiEvent::RemoveLine => self.state.remove_line(),
            UiEvent::CycleCurrency => self.state.cycle_currency(),
            UiEvent::ChooseCustomer => self.state.choose_customer(),
            UiEvent::EnterPayment => self.state.enter_payment(),
            UiEvent::SubmitSale => self.state.submit_sale(),
            UiEvent::PrintReceipt => self.state.print_receipt(),

            // Products
            UiEvent::Transfer => self.state.start_transfer(),

            // Purchase orders
            UiEvent::AddOrderItem => self.state.add_order_item(),
            UiEvent::RemoveOrderItem => self.state.remove_order_item(),
            UiEvent::DownloadPdf => self.state.download_pdf(),

            // Settings
            UiEvent::EditPrinter => self.state.edit_printer(),
            UiEvent::TestPrint => self.state.test_print(),
            UiEvent::ChangePassword => self.state.change_password(),
            UiEvent::SignOut => self.state.sign_out(),

            // Modals
            UiEvent::Confirm => self.state.confirm(),
            UiEvent::Deny => self.state.deny(),
            UiEvent::DismissNotice => self.state.dismiss_notice(),
            UiEvent::Retry => self.state.retry(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::messages::ui_events::Screen;
    use crate::storage::Storage;

    #[tokio::test]
    async fn quit_shuts_down_network() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(Settings::default(), Storage::new(dir.path()));
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (_net_tx, net_rx) = mpsc::unbounded_channel();
        let (network_tx, mut network_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();

        let actor = AppActor::new(state, network_tx, render_tx);
        let handle = tokio::spawn(actor.run(ui_rx, net_rx));

        let first = render_rx.recv().await.unwrap();
        assert_eq!(first.screen, Screen::SignIn);

        ui_tx.send(UiEvent::GoToSignUp).unwrap();
        let next = render_rx.recv().await.unwrap();
        assert_eq!(next.screen, Screen::SignUp);

        ui_tx.send(UiEvent::Quit).unwrap();
        handle.await.unwrap();
        assert!(matches!(network_rx.recv().await, Some(NetworkCommand::Shutdown)));
    }
}
